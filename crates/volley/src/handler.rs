//! Per-connection handler: registration, relay, and teardown.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Derive a `ParticipantId` from the connection — identity is the
//!      socket, nothing else. No handshake, no auth.
//!   2. Register an outbound queue and spawn a writer task to drain it.
//!   3. Loop: receive frames → decode → one lobby step → queue the
//!      resulting deliveries.
//!   4. On exit (close, error, panic) the drop guard tears the
//!      participant down and notifies a surviving opponent.
//!
//! There is no read timeout: a participant may wait in the queue
//! indefinitely, and an established match has no server-side pace
//! requirement. The relay only learns a peer is gone when the socket
//! says so.

use std::sync::Arc;

use tokio::sync::mpsc;
use volley_match::Delivery;
use volley_protocol::{ClientEvent, Codec, ParticipantId, ServerEvent};
use volley_transport::{Connection, WebSocketConnection};

use crate::VolleyError;
use crate::server::ServerState;

/// Drop guard that tears a participant down when the handler exits.
///
/// This ensures cleanup happens even if the handler panics: the
/// waiting slot is cleared, the session (if any) is closed, the
/// survivor gets its `opponentLeft`, and the outbound queue is
/// removed — which ends the writer task. Since `Drop` is synchronous,
/// we spawn a fire-and-forget task for the async locks.
struct DisconnectGuard<C: Codec> {
    participant: ParticipantId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let participant = self.participant;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let deliveries =
                state.lobby.lock().await.disconnect(participant);
            dispatch(&state, deliveries).await;
            state.peers.lock().await.remove(&participant);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), VolleyError> {
    let participant = ParticipantId(conn.id().into_inner());
    tracing::debug!(%participant, "handling new connection");

    // Register the outbound queue and guard atomically — once the
    // queue is visible to other handlers, teardown must be guaranteed.
    let (tx, rx) = mpsc::unbounded_channel();
    state.peers.lock().await.insert(participant, tx);
    let _guard = DisconnectGuard {
        participant,
        state: Arc::clone(&state),
    };

    // The writer drains the queue on its own task so a slow socket
    // never blocks the lobby or the opponent's handler. It ends when
    // the guard removes the queue's sender.
    tokio::spawn(outbound_loop(conn.clone(), rx, Arc::clone(&state)));

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%participant, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%participant, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                // Malformed input never kills the connection.
                tracing::debug!(
                    %participant, error = %e, "undecodable frame, dropping"
                );
                continue;
            }
        };

        // One synchronous lobby step per inbound event. Lock released
        // before any delivery is queued downstream of a peer's writer.
        let deliveries = {
            let mut lobby = state.lobby.lock().await;
            match event {
                ClientEvent::SetUsername { name } => {
                    lobby.register(participant, &name)
                }
                gameplay => lobby.relay(participant, gameplay),
            }
        };
        dispatch(&state, deliveries).await;
    }

    // _guard drops here → lobby disconnect fires.
    Ok(())
}

/// Queues each delivery on its recipient's outbound channel.
pub(crate) async fn dispatch<C: Codec>(
    state: &ServerState<C>,
    deliveries: Vec<Delivery>,
) {
    if deliveries.is_empty() {
        return;
    }
    let peers = state.peers.lock().await;
    for (recipient, event) in deliveries {
        match peers.get(&recipient) {
            // A send error means the recipient's writer already shut
            // down; its own guard handles the bookkeeping.
            Some(tx) => {
                let _ = tx.send(event);
            }
            None => {
                tracing::debug!(
                    participant = %recipient,
                    "delivery to absent peer dropped"
                );
            }
        }
    }
}

/// Writer task: encodes queued events and sends them in queue order.
async fn outbound_loop<C: Codec>(
    conn: WebSocketConnection,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<C>>,
) {
    while let Some(event) = rx.recv().await {
        let bytes = match state.codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode event");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(
                conn_id = %conn.id(), error = %e, "send failed, writer exiting"
            );
            break;
        }
    }
    let _ = conn.close().await;
}
