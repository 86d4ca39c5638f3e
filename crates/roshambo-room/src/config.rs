//! Registry configuration and the room status report.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`RoomRegistry`](crate::RoomRegistry).
///
/// The defaults describe the baseline deployment: two-player rooms,
/// created on demand when an unknown room id shows up in a join, with
/// six-character identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum players per room, enforced at join time. A join beyond
    /// the cap is rejected with `RoomError::RoomFull` rather than
    /// silently admitting a spectator.
    pub max_players: usize,

    /// Whether a join for an unknown room id creates the room on demand.
    /// Disable to require explicit room creation first, in which case an
    /// unknown id is rejected with `RoomError::NotFound`.
    pub create_on_join: bool,

    /// Length of generated room identifiers. Six lowercase alphanumeric
    /// characters give ~2 billion ids — collision-resistant enough for
    /// casual room counts, not cryptographically unique.
    pub room_id_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_players: 2,
            create_on_join: true,
            room_id_len: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// What a status query reports about a room.
///
/// Purely derived from the registry's current member count — there is no
/// separate status state to keep in sync. On the wire the variants are
/// snake_case (`"not_found"`, `"available"`, `"full"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// No room with this id exists (never created, or already emptied
    /// and destroyed).
    NotFound,

    /// The room exists and has a free player slot.
    Available,

    /// The room exists and every player slot is taken.
    Full,
}

impl RoomStatus {
    /// Returns `true` if a join attempt could currently succeed.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Available => write!(f, "available"),
            Self::Full => write!(f, "full"),
        }
    }
}
