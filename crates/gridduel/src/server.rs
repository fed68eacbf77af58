//! `GridDuelServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → room registry.

use std::sync::Arc;

use gridduel_protocol::{Codec, JsonCodec};
use gridduel_room::{RoomConfig, RoomRegistry};
use gridduel_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::GridDuelError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Grid Duel server.
///
/// # Example
///
/// ```rust,no_run
/// use gridduel::prelude::*;
///
/// # async fn start() -> Result<(), GridDuelError> {
/// let server = GridDuelServer::builder()
///     .bind("0.0.0.0:3000")
///     .room_config(RoomConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GridDuelServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl GridDuelServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the rules every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener. Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<GridDuelServer<JsonCodec>, GridDuelError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new(self.room_config)),
            codec: JsonCodec,
        });

        Ok(GridDuelServer { transport, state })
    }
}

impl Default for GridDuelServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Grid Duel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridDuelServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GridDuelServer {
    pub fn builder() -> GridDuelServerBuilder {
        GridDuelServerBuilder::new()
    }
}

impl<C: Codec> GridDuelServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated, spawning a
    /// handler task for every connection.
    pub async fn run(mut self) -> Result<(), GridDuelError> {
        tracing::info!("Grid Duel server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
