mod error;
pub mod fs;
pub mod global;
pub mod resume;
mod store;

pub use error::*;
pub use resume::{MAX_RESUME_BYTES, read_resume_file};
pub use store::{ContextStore, StoreKey};
