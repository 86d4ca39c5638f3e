//! Wire protocol for Roshambo.
//!
//! This crate defines the "language" that clients and the relay speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Move`], etc.) —
//!   the message structures that travel on the wire.
//! - **Inbound classification** ([`parse_client_message`]) — how a raw
//!   text frame becomes a typed message, and how the failure modes are
//!   told apart.
//! - **Errors** ([`ProtocolError`]) — what can go wrong on the way in.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (text frames) and the
//! room layer (membership and rounds). It doesn't know about sockets or
//! rooms — it only knows what the messages look like.
//!
//! ```text
//! Transport (text) → Protocol (ClientMessage) → Room (membership, rounds)
//! ```

mod error;
mod inbound;
mod types;

pub use error::ProtocolError;
pub use inbound::parse_client_message;
pub use types::{ClientMessage, Move, PlayerId, RoomId, ServerMessage};
