//! `VolleyServer` builder and server loop.
//!
//! This is the entry point for running a Volley relay. It ties
//! together all the layers: transport → protocol → match.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use volley_match::Lobby;
use volley_protocol::{Codec, JsonCodec, ParticipantId, ServerEvent};
use volley_transport::{Transport, WebSocketTransport};

use crate::VolleyError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// lobby holds the entire pairing/relay state behind one mutex; every
/// inbound event takes it for exactly one synchronous, non-awaiting
/// step, so the critical section never spans network I/O. `peers` maps
/// each live participant to its outbound queue — actual sends happen
/// on per-connection writer tasks, after the lobby lock is released.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) lobby: Mutex<Lobby>,
    pub(crate) peers:
        Mutex<HashMap<ParticipantId, mpsc::UnboundedSender<ServerEvent>>>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Volley server.
///
/// # Example
///
/// ```rust,ignore
/// use volley::prelude::*;
///
/// let server = VolleyServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct VolleyServerBuilder {
    bind_addr: String,
}

impl VolleyServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Builds and starts the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` — browser clients
    /// speak JSON over a plain WebSocket, no handshake layer on top.
    pub async fn build(self) -> Result<VolleyServer<JsonCodec>, VolleyError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            lobby: Mutex::new(Lobby::new()),
            peers: Mutex::new(HashMap::new()),
            codec: JsonCodec,
        });

        Ok(VolleyServer { transport, state })
    }
}

impl Default for VolleyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Volley relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct VolleyServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> VolleyServer<C> {
    /// Creates a new builder.
    pub fn builder() -> VolleyServerBuilder {
        VolleyServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each
    /// participant. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), VolleyError> {
        tracing::info!("Volley relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
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
