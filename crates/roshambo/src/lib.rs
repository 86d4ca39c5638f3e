//! # Roshambo
//!
//! A minimal real-time multiplayer relay: clients join a room over a
//! WebSocket, submit rock-paper-scissors moves, and every member receives
//! the resolved result. The room and round machinery lives in
//! `roshambo-room`; the wire contract in `roshambo-protocol`; this crate
//! is the server surface that ties them to the network:
//!
//! - `GET /` — health check
//! - `POST /create_room` — mint a fresh room id
//! - `GET /rooms/{room_id}/status` — `not_found` / `available` / `full`
//! - `GET /ws/{room_id}/{player_id}` — WebSocket upgrade into a session
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use roshambo::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roshambo::ServerError> {
//!     let server = ServerBuilder::new().bind("0.0.0.0:8080").build().await?;
//!     server.run().await
//! }
//! ```

mod error;
mod routes;
mod server;
mod session;

pub use error::ServerError;
pub use server::{router, AppState, Server, ServerBuilder};
