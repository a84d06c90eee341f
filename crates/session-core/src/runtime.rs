use crate::events::SessionEvent;

/// Host surface for session events: the CLI prints them, a UI forwards them,
/// tests collect them.
pub trait SessionRuntime: Send + Sync + 'static {
    fn emit(&self, event: SessionEvent);
}
