//! The Pong relay server.
//!
//! Pairs WebSocket clients into two-player matches and relays paddle,
//! ball, and score frames between them. All game logic lives in the
//! clients; see `volley-sim` for the client-side state machine.

use volley::prelude::*;

#[tokio::main]
async fn main() -> Result<(), VolleyError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let server = VolleyServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "pong relay listening");
    server.run().await
}

// =========================================================================
// Tests
// =========================================================================
