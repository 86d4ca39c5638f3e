//! Server-level errors.
//!
//! Almost nothing in this service is fatal: malformed frames are dropped,
//! room errors close one socket, broadcast failures skip one recipient.
//! What remains fatal is the server's own plumbing — binding the listener
//! and running the accept loop.

/// Errors that can abort the server itself.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding the listener or serving connections failed.
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}
