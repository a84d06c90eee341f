use crate::types::{ChatCompletionRequest, ChatMessage};

pub const COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_ANSWER_TOKENS: u32 = 250;

/// Resume context embedded in the system message is capped at this many
/// characters (Unicode scalar values).
pub const RESUME_CONTEXT_LIMIT: usize = 3000;

const BRIEF_ANSWER_INSTRUCTION: &str = "You are a helpful interview assistant that answers questions quickly and concisely. Keep answers brief but complete, ideally 1-3 sentences unless more detail is absolutely necessary.";

pub fn build_system_message(resume_context: Option<&str>) -> String {
    let Some(resume) = resume_context.filter(|r| !r.is_empty()) else {
        return BRIEF_ANSWER_INSTRUCTION.to_string();
    };

    format!(
        "You are a helpful interview assistant that answers questions quickly and concisely, tailoring your responses based on the candidate's background. Here is the candidate's resume/CV information to reference:\n\n{}\n\nKeep answers brief but complete, ideally 1-3 sentences unless more detail is absolutely necessary. Personalize your responses based on the resume where relevant.",
        truncate_chars(resume, RESUME_CONTEXT_LIMIT)
    )
}

pub fn build_request(question: &str, resume_context: Option<&str>) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: COMPLETION_MODEL.to_string(),
        messages: vec![
            ChatMessage::system(build_system_message(resume_context)),
            ChatMessage::user(question),
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_ANSWER_TOKENS,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}
