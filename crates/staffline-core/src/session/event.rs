//! Session lifecycle events.

/// Events emitted by the HTTP layer about the current session.
///
/// The API client only reports; the session owner decides what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server answered 401: the stored credential is no longer valid.
    Invalidated,
}
