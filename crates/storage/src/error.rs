#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("data directory not available")]
    DataDirUnavailable,
    #[error("unsupported resume format: .{0}")]
    UnsupportedFormat(String),
    #[error("resume file has no recognizable extension")]
    MissingExtension,
    #[error("resume file exceeds the {0} byte limit")]
    FileTooLarge(u64),
}
