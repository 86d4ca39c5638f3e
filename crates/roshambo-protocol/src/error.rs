//! Error types for the protocol layer.
//!
//! Each crate in Roshambo defines its own error enum. When you see a
//! `ProtocolError`, the problem is in parsing an inbound frame — not in
//! networking or room management.
//!
//! The variants deliberately separate "the envelope itself is garbage"
//! from "we understood the envelope but don't care about it". The session
//! loop drops both without replying, but logs them at different levels.

/// Errors that can occur while parsing an inbound message.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON at all.
    ///
    /// This is a protocol violation by the client — a cooperative client
    /// never sends it. Logged at `warn`, but the connection stays open.
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The frame is valid JSON with a recognized `"type"`, but the body
    /// doesn't fit — a missing field, or a move string outside
    /// rock/paper/scissors. Rejected here so an invalid move can never
    /// reach the resolver.
    #[error("invalid message body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// The frame is valid JSON but carries a `"type"` this server does
    /// not recognize. Safe to ignore — the client may simply be newer
    /// than us.
    #[error("unrecognized message type: {0}")]
    UnrecognizedType(String),

    /// The frame is valid JSON but has no string `"type"` discriminator.
    #[error("message has no type discriminator")]
    MissingType,
}
