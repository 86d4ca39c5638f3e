//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Each room runs in its own task, communicating with session tasks
//! through an mpsc command channel. No shared mutable state — the
//! mailbox serializes every mutation, which is what makes the "exactly
//! two moves pending" check race-free.

use std::collections::{BTreeMap, HashMap};

use roshambo_protocol::{Move, PlayerId, RoomId, ServerMessage};
use tokio::sync::{mpsc, oneshot};

use crate::rules::{self, Outcome};
use crate::RoomError;

/// Channel sender for delivering broadcasts to one member's session.
///
/// The actor holds only this sender — the session task owns the socket
/// and drains the receiving end into it. Unbounded because broadcasts
/// are tiny and sessions drain them immediately; a dead receiver just
/// makes `send` fail, which the actor treats as best-effort delivery.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
///
/// Variants that need an answer carry a `oneshot::Sender` reply channel;
/// the caller awaits the response on it.
pub(crate) enum RoomCommand {
    /// Add a member. Replies with the join outcome.
    Join {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a member. Replies with the remaining member count so the
    /// registry knows when to destroy the room. A leave for an absent
    /// player is a no-op, not a fault.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<usize>,
    },

    /// Record a member's move for the current round (fire-and-forget).
    Move { player_id: PlayerId, mv: Move },

    /// Fan a message out to every member (fire-and-forget).
    Broadcast { message: ServerMessage },

    /// Request a snapshot of the room's metadata.
    Status { reply: oneshot::Sender<RoomSnapshot> },

    /// Stop the actor. Issued by the registry once the room is empty.
    Shutdown,
}

/// A point-in-time view of a room's metadata (not its pending moves).
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    /// The room's identifier.
    pub room_id: RoomId,
    /// Number of members currently attached.
    pub player_count: usize,
    /// Maximum members allowed.
    pub max_players: usize,
}

/// Handle to a running room actor.
///
/// Cheap to clone — it's an `mpsc::Sender` wrapper. The registry holds
/// one per room; each session keeps a clone after joining so moves don't
/// have to go back through the registry lock.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's identifier.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Asks the room to admit a member.
    pub async fn join(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    /// Asks the room to drop a member. Returns the remaining member
    /// count. Safe to call for a player who already left.
    pub async fn leave(
        &self,
        player_id: PlayerId,
    ) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Records a member's move for the current round.
    pub async fn submit_move(
        &self,
        player_id: PlayerId,
        mv: Move,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Move { player_id, mv })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Fans a message out to every member.
    pub async fn broadcast(
        &self,
        message: ServerMessage,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Broadcast { message })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Requests the room's current snapshot.
    pub async fn status(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Status { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    max_players: usize,
    /// Members in join order. Join order fixes slot assignment for
    /// round resolution: the first joiner is slot one.
    members: Vec<(PlayerId, PlayerSender)>,
    /// Moves declared for the in-progress round only. Cleared after
    /// every resolution. Never exceeds `max_players` entries because
    /// only members can record a move.
    pending: HashMap<PlayerId, Move>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::debug!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let remaining = self.handle_leave(player_id);
                    let _ = reply.send(remaining);
                }
                RoomCommand::Move { player_id, mv } => {
                    self.handle_move(player_id, mv);
                }
                RoomCommand::Broadcast { message } => {
                    self.broadcast(&message);
                }
                RoomCommand::Status { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                RoomCommand::Shutdown => break,
            }
        }

        tracing::debug!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if self.members.iter().any(|(id, _)| *id == player_id) {
            return Err(RoomError::AlreadyJoined(
                player_id,
                self.room_id.clone(),
            ));
        }
        if self.members.len() >= self.max_players {
            return Err(RoomError::RoomFull(self.room_id.clone()));
        }

        self.members.push((player_id.clone(), sender));
        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            players = self.members.len(),
            "player joined"
        );

        // Everyone hears about the join, the new member included.
        self.broadcast(&ServerMessage::PlayerJoin {
            player_id,
            player_count: self.members.len(),
        });

        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> usize {
        let Some(pos) = self
            .members
            .iter()
            .position(|(id, _)| *id == player_id)
        else {
            // Already gone — idempotent no-op, no announcement.
            return self.members.len();
        };
        self.members.remove(pos);

        // A stale move must not resolve against someone who joins later.
        self.pending.remove(&player_id);

        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            players = self.members.len(),
            "player left"
        );

        self.broadcast(&ServerMessage::PlayerLeave {
            player_id,
            player_count: self.members.len(),
        });

        self.members.len()
    }

    fn handle_move(&mut self, player_id: PlayerId, mv: Move) {
        if !self.members.iter().any(|(id, _)| *id == player_id) {
            tracing::warn!(
                room_id = %self.room_id,
                %player_id,
                "move from non-member, ignoring"
            );
            return;
        }

        // Overwrite is deliberate: until the second player submits, a
        // member may change their mind and the last declaration stands.
        if self.pending.insert(player_id.clone(), mv).is_some() {
            tracing::debug!(
                room_id = %self.room_id,
                %player_id,
                "move replaced before resolution"
            );
        }

        if self.pending.len() == 2 {
            self.resolve_round();
        }
    }

    /// Resolves the round from the two pending moves and announces the
    /// result, then clears the slate for the next round.
    ///
    /// Slots come from join order, not submission order: the first
    /// member with a pending move occupies slot one.
    fn resolve_round(&mut self) {
        let mut movers = self
            .members
            .iter()
            .filter(|(id, _)| self.pending.contains_key(id))
            .map(|(id, _)| id.clone());
        let (Some(one), Some(two)) = (movers.next(), movers.next()) else {
            // Both pending moves belong to members, so two movers always
            // exist here; guard anyway rather than panic in the actor.
            return;
        };
        drop(movers);

        let move_one = self.pending[&one];
        let move_two = self.pending[&two];

        let winner = match rules::resolve(move_one, move_two) {
            Outcome::PlayerOne => Some(one.clone()),
            Outcome::PlayerTwo => Some(two.clone()),
            Outcome::Draw => None,
        };

        let moves: BTreeMap<PlayerId, Move> =
            self.pending.drain().collect();

        tracing::info!(
            room_id = %self.room_id,
            winner = winner.as_ref().map(|w| w.as_str()).unwrap_or("draw"),
            "round resolved"
        );

        self.broadcast(&ServerMessage::Result { winner, moves });
    }

    /// Sends a message to every member in join order, best-effort.
    ///
    /// A failed send means that member's session is tearing down; it is
    /// skipped and never blocks delivery to the rest.
    fn broadcast(&self, message: &ServerMessage) {
        for (player_id, sender) in &self.members {
            if sender.send(message.clone()).is_err() {
                tracing::debug!(
                    room_id = %self.room_id,
                    %player_id,
                    "member unreachable during broadcast, skipping"
                );
            }
        }
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id.clone(),
            player_count: self.members.len(),
            max_players: self.max_players,
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
///
/// `channel_size` bounds the command mailbox — if it fills, senders wait.
pub(crate) fn spawn_room(
    room_id: RoomId,
    max_players: usize,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room_id: room_id.clone(),
        max_players,
        members: Vec::new(),
        pending: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
