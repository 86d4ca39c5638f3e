//! The room registry: single source of truth for "which rooms exist".
//!
//! An explicitly owned instance shared as `Arc` — never a process-wide
//! global. The internal mutex guards only the id→handle map; everything
//! stateful about a single room lives in that room's actor, so the lock
//! is held across nothing slower than an actor handshake.

use std::collections::HashMap;

use rand::distr::Alphanumeric;
use rand::Rng;
use roshambo_protocol::{PlayerId, RoomId, ServerMessage};
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{PlayerSender, RegistryConfig, RoomError, RoomHandle, RoomStatus};

/// Command mailbox size for room actors.
const ROOM_CHANNEL_SIZE: usize = 64;

/// Creates, tracks, and destroys rooms; routes joins and fan-out.
///
/// Rooms are created lazily on join (when configured) or explicitly via
/// [`create_room`](Self::create_room), and destroyed the moment their
/// last member leaves. Everything is in-memory and process-lifetime —
/// a restart forgets all rooms.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, RoomHandle>>,
    config: RegistryConfig,
}

impl RoomRegistry {
    /// Creates an empty registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Returns the registry's configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates a new empty room and returns its freshly generated id.
    ///
    /// Cannot fail: id collisions are re-rolled (at six alphanumeric
    /// characters they are vanishingly rare at casual room counts).
    pub async fn create_room(&self) -> RoomId {
        let mut rooms = self.rooms.lock().await;

        let room_id = loop {
            let candidate = generate_room_id(self.config.room_id_len);
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let handle = spawn_room(
            room_id.clone(),
            self.config.max_players,
            ROOM_CHANNEL_SIZE,
        );
        rooms.insert(room_id.clone(), handle);
        tracing::info!(%room_id, "room created");
        room_id
    }

    /// Attaches a player to a room, creating it on demand when the
    /// configuration allows.
    ///
    /// On success the room has already announced `player_join` to every
    /// member (the new one included), and the returned handle lets the
    /// session submit moves without going back through the registry
    /// lock.
    ///
    /// # Errors
    ///
    /// - [`RoomError::NotFound`] — unknown room and create-on-join is
    ///   disabled.
    /// - [`RoomError::RoomFull`] — the player cap is already reached.
    /// - [`RoomError::AlreadyJoined`] — a member with this id exists.
    pub async fn join(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        let mut rooms = self.rooms.lock().await;

        let (handle, created) = match rooms.get(room_id) {
            Some(handle) => (handle.clone(), false),
            None if self.config.create_on_join => {
                let handle = spawn_room(
                    room_id.clone(),
                    self.config.max_players,
                    ROOM_CHANNEL_SIZE,
                );
                rooms.insert(room_id.clone(), handle.clone());
                tracing::info!(%room_id, "room created on join");
                (handle, true)
            }
            None => return Err(RoomError::NotFound(room_id.clone())),
        };

        match handle.join(player_id, sender).await {
            Ok(()) => Ok(handle),
            Err(e) => {
                // Don't leak a room that was created for a join that
                // never happened.
                if created {
                    rooms.remove(room_id);
                    let _ = handle.shutdown().await;
                }
                Err(e)
            }
        }
    }

    /// Detaches a player from a room and destroys the room if it became
    /// empty.
    ///
    /// Idempotent and infallible: an unknown room, a player who already
    /// left, and a second call for the same pair are all no-ops.
    pub async fn leave(&self, room_id: &RoomId, player_id: &PlayerId) {
        let mut rooms = self.rooms.lock().await;

        let Some(handle) = rooms.get(room_id).cloned() else {
            return;
        };

        match handle.leave(player_id.clone()).await {
            Ok(0) => {
                rooms.remove(room_id);
                let _ = handle.shutdown().await;
                tracing::info!(%room_id, "room emptied and destroyed");
            }
            Ok(_) => {}
            Err(_) => {
                // The actor is already gone; drop the stale handle.
                rooms.remove(room_id);
            }
        }
    }

    /// Fans a message out to every live member of a room, best-effort.
    ///
    /// An unknown room is a no-op; a failed delivery to one member never
    /// surfaces to the caller.
    pub async fn broadcast(&self, room_id: &RoomId, message: ServerMessage) {
        let handle = self.rooms.lock().await.get(room_id).cloned();
        if let Some(handle) = handle {
            if handle.broadcast(message).await.is_err() {
                tracing::debug!(%room_id, "broadcast to defunct room dropped");
            }
        }
    }

    /// Reports a room's status, derived purely from its member count.
    pub async fn status(&self, room_id: &RoomId) -> RoomStatus {
        let handle = self.rooms.lock().await.get(room_id).cloned();
        let Some(handle) = handle else {
            return RoomStatus::NotFound;
        };

        match handle.status().await {
            Ok(snapshot) if snapshot.player_count >= snapshot.max_players => {
                RoomStatus::Full
            }
            Ok(_) => RoomStatus::Available,
            // Actor gone but not yet reaped — indistinguishable from a
            // destroyed room as far as callers care.
            Err(_) => RoomStatus::NotFound,
        }
    }

    /// Returns the number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Lists the ids of all live rooms.
    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.lock().await.keys().cloned().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

/// Generates a short lowercase alphanumeric room identifier.
fn generate_room_id(len: usize) -> RoomId {
    let id: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    RoomId(id)
}
