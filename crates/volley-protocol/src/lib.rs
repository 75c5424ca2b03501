//! Wire protocol for Volley.
//!
//! This crate defines the "language" that game clients and the relay
//! server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], the frame structs) —
//!   the messages that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the match
//! layer (pairing, relay). It doesn't know about connections or
//! sessions — it only knows how to serialize and deserialize events.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEvent/ServerEvent) → Match (lobby)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BallFrame, ClientEvent, PaddleFrame, ParticipantId, ScoreFrame,
    ServerEvent, SessionId,
};
