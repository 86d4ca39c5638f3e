//! Error types for the room layer.

use roshambo_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (and create-on-join is disabled).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room already holds its maximum number of players.
    ///
    /// Admitting a third connection would make it a spectator whose
    /// moves corrupt round resolution, so the cap is enforced at join.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// A member with this player id is already in the room. The pending
    /// move map is keyed by player id, so a duplicate would let two
    /// connections share one move slot.
    #[error("player {0} already joined room {1}")]
    AlreadyJoined(PlayerId, RoomId),

    /// The room's command channel is closed — the actor is gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
