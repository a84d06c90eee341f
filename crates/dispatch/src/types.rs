#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// One completed dispatch cycle. Append-only, never mutated after creation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: Option<String>,
    pub error: Option<String>,
}

/// Immutable input to each dispatch call; persisted externally.
#[derive(Debug, Clone, Default)]
pub struct CredentialConfig {
    pub api_key: String,
    pub resume_context: Option<String>,
}

impl CredentialConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            resume_context: None,
        }
    }

    pub fn with_resume(mut self, resume_context: impl Into<String>) -> Self {
        self.resume_context = Some(resume_context.into());
        self
    }
}
