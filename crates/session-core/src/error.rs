pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("session is no longer running")]
    SessionClosed,
    #[error(transparent)]
    Dispatch(#[from] candor_dispatch::Error),
}
