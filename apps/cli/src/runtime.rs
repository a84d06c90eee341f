use candor_session_core::{SessionEvent, SessionRuntime};

/// Prints session events: human-readable progress on stderr, answer records
/// as JSON lines on stdout so they can be piped.
pub struct PrintRuntime;

impl SessionRuntime for PrintRuntime {
    fn emit(&self, event: SessionEvent) {
        match &event {
            SessionEvent::ListeningStarted { session_id } => {
                eprintln!("[session] listening session={session_id}");
            }
            SessionEvent::ListeningStopped { .. } => {
                eprintln!("[session] stopped");
            }
            SessionEvent::QuestionDetected { question, .. } => {
                eprintln!("[question] {}", question.text);
            }
            SessionEvent::QuestionDropped { question, .. } => {
                eprintln!("[question] dropped while busy: {question}");
            }
            SessionEvent::DispatchFailed { error, .. } => {
                eprintln!("[error] {error}");
            }
            SessionEvent::AnswerAdded { record, .. } => {
                println!("{}", serde_json::to_string(record).unwrap_or_default());
            }
        }
    }
}
