#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Question is required")]
    QuestionRequired,
    #[error("API key is required")]
    ApiKeyRequired,
    #[error("completion service returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("completion response contained no answer")]
    MissingAnswer,
}

impl Error {
    /// Validation errors are reported before any network call is made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::QuestionRequired | Error::ApiKeyRequired)
    }
}
