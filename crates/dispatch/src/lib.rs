mod client;
mod dispatcher;
mod error;
pub mod prompt;
mod types;

pub use client::{CompletionClient, OPENAI_API_BASE, OpenAiClient, PendingRequest};
pub use dispatcher::QuestionDispatcher;
pub use error::Error;
pub use types::{AnswerRecord, ChatCompletionRequest, ChatMessage, CredentialConfig};
