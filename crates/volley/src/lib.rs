//! # Volley
//!
//! Two-player realtime matchmaking and state relay over WebSockets.
//!
//! Volley pairs anonymous WebSocket connections into two-player
//! sessions and relays gameplay state between them. The server owns
//! pairing and message routing and nothing else — game rules, physics,
//! and scoring live in the clients (the first joiner of each session
//! is the authoritative simulator; see the `volley-sim` crate).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use volley::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), VolleyError> {
//!     let server = VolleyServer::<JsonCodec>::builder()
//!         .bind("0.0.0.0:3000")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::VolleyError;
pub use server::{VolleyServer, VolleyServerBuilder};

/// Commonly used types, re-exported for one-line imports.
pub mod prelude {
    pub use crate::error::VolleyError;
    pub use crate::server::{VolleyServer, VolleyServerBuilder};
    pub use volley_match::{Delivery, Lobby};
    pub use volley_protocol::{
        BallFrame, ClientEvent, Codec, JsonCodec, PaddleFrame,
        ParticipantId, ScoreFrame, ServerEvent, SessionId,
    };
    pub use volley_transport::{Connection, ConnectionId, Transport};
}
