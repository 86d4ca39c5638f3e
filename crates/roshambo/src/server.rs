//! Server builder, router assembly, and the serve loop.
//!
//! The router is exposed separately from the listener so tests can drive
//! it in-process without a socket.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use roshambo_room::{RegistryConfig, RoomRegistry};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{routes, session, ServerError};

/// Shared state handed to every request handler and session task.
///
/// Cheap to clone — the registry is behind an `Arc`, exactly one of
/// which exists per server (no process-wide globals).
#[derive(Clone)]
pub struct AppState {
    /// The single source of truth for rooms and membership.
    pub registry: Arc<RoomRegistry>,
}

impl AppState {
    /// Creates state backed by a fresh registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new(config)),
        }
    }
}

/// Builds the application router over the given state.
///
/// CORS is deliberately wide open: the browser client is served from a
/// different origin than the relay, and the relay holds nothing worth
/// protecting from cross-origin reads.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health))
        .route("/create_room", post(routes::create_room))
        .route("/rooms/:room_id/status", get(routes::room_status))
        .route("/ws/:room_id/:player_id", get(session::ws_upgrade))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builder for configuring and starting a relay server.
pub struct ServerBuilder {
    bind_addr: String,
    registry_config: RegistryConfig,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            registry_config: RegistryConfig::default(),
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room registry configuration.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.registry_config = config;
        self
    }

    /// Binds the listener and assembles the server.
    pub async fn build(self) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        let state = AppState::new(self.registry_config);
        tracing::info!(addr = %self.bind_addr, "listener bound");
        Ok(Server { listener, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound, ready-to-run relay server.
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns the shared state (handy for tests and embedding).
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Serves connections until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("roshambo relay running");
        axum::serve(self.listener, router(self.state)).await?;
        Ok(())
    }
}
