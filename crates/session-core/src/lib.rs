mod error;
pub mod events;
pub mod runtime;
pub mod session;

pub use error::{Error, Result};
pub use events::SessionEvent;
pub use runtime::SessionRuntime;
pub use session::{SessionHandle, SessionParams, spawn_session};
