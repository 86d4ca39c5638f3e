//! Room lifecycle management for Roshambo.
//!
//! Each room runs as an isolated Tokio task (actor model) with its own
//! member list and pending-move state. The actor's mailbox is what
//! serializes concurrent mutations of one room — two near-simultaneous
//! moves can never both observe "one move pending" — while different
//! rooms proceed independently.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — owns the room map; creates, routes, destroys
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RegistryConfig`] — player cap, create-on-join policy, id length
//! - [`RoomStatus`] — what a status query reports about a room
//! - [`rules`] — the pure round-resolution functions

mod config;
mod error;
mod registry;
mod room;
pub mod rules;

pub use config::{RegistryConfig, RoomStatus};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{PlayerSender, RoomHandle, RoomSnapshot};
