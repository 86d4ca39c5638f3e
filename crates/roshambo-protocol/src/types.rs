//! Core protocol types for Roshambo's wire format.
//!
//! Every type here travels "on the wire": serialized to JSON text frames,
//! sent over the WebSocket, and parsed on the other side. The JSON shapes
//! are an external contract with the browser client — the unit tests at
//! the bottom of this file pin them down field by field.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier within a room.
///
/// Caller-supplied and opaque — the relay trusts whatever the client put
/// in the connection path and uses it only as a mapping key. A newtype
/// rather than a bare `String` so a `PlayerId` can't be passed where a
/// `RoomId` is expected.
///
/// `#[serde(transparent)]` makes it serialize as the plain string, so
/// `PlayerId("alice")` is just `"alice"` in JSON.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A room's identifier: a short, URL-safe, opaque string.
///
/// Generated server-side (see the room crate's registry) as a truncated
/// random identifier — collision-resistant enough for casual use, not
/// cryptographically unique.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// One of the three legal moves.
///
/// This is a closed enum on purpose: an inbound `"move"` string outside
/// these three fails deserialization, so the round resolver never sees an
/// unrecognized move. On the wire the variants are lowercase
/// (`"rock"`, `"paper"`, `"scissors"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rock => write!(f, "rock"),
            Self::Paper => write!(f, "paper"),
            Self::Scissors => write!(f, "scissors"),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientMessage — what clients send
// ---------------------------------------------------------------------------

/// Messages a client may send once connected.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, so a move
/// submission looks like:
///
/// ```json
/// {"type": "move", "move": "rock"}
/// ```
///
/// Currently `move` is the only recognized type. Frames with any other
/// `"type"` are classified by [`parse_client_message`] and silently
/// dropped by the session loop.
///
/// [`parse_client_message`]: crate::parse_client_message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Declare this round's move.
    Move {
        /// The declared move. `move` is a Rust keyword, hence the rename.
        #[serde(rename = "move")]
        mv: Move,
    },
}

/// The `"type"` tags this server recognizes in client frames.
///
/// Used by inbound classification to tell "recognized but broken" apart
/// from "not our message".
pub(crate) const CLIENT_MESSAGE_TYPES: &[&str] = &["move"];

// ---------------------------------------------------------------------------
// ServerMessage — what the relay broadcasts
// ---------------------------------------------------------------------------

/// Messages the relay broadcasts to a room.
///
/// Same internal tagging as [`ClientMessage`]; the snake_case tags
/// (`player_join`, `player_leave`, `result`) are part of the client
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A player joined the room. Sent to every member, including the one
    /// who just joined. `player_count` lets clients keep a roster count
    /// without tracking joins themselves.
    PlayerJoin {
        player_id: PlayerId,
        player_count: usize,
    },

    /// A player left the room. Carries the updated count for the same
    /// reason as `PlayerJoin`.
    PlayerLeave {
        player_id: PlayerId,
        player_count: usize,
    },

    /// A round resolved. `winner` is `null` on a draw. `moves` echoes
    /// the full move mapping so each client can render both sides of
    /// the outcome.
    Result {
        winner: Option<PlayerId>,
        moves: BTreeMap<PlayerId, Move>,
    },
}

// =========================================================================
// Tests
// =========================================================================
