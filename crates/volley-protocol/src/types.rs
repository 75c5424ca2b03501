//! Core protocol types for Volley's wire format.
//!
//! Every type here travels "on the wire": it is serialized to bytes,
//! sent over the WebSocket, and deserialized on the other side. The
//! event tags are part of the protocol contract — a browser client
//! matches on the `type` field of each JSON object, so the serde
//! attributes below define exact wire shapes, not implementation
//! detail.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected participant.
///
/// Participant identity *is* connection identity: a participant is
/// created when a socket connects and destroyed when it disconnects.
/// There is no account layer underneath.
///
/// Newtype over `u64` so a `ParticipantId` can never be confused with
/// a [`SessionId`] in a signature, even though both are `u64` inside.
/// `#[serde(transparent)]` keeps the JSON representation a plain
/// number (`42`, not `{"0":42}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a session (one active two-player match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Gameplay frames
// ---------------------------------------------------------------------------

/// A normalized paddle position.
///
/// `index` is the side the paddle belongs to (0 = left/host, 1 =
/// right). `y` is the paddle's top edge as a fraction of the
/// receiver-independent track `[0, 1]`, where the track is
/// `viewport_height - paddle_height`. Receivers denormalize against
/// their own viewport, which is what keeps the game playable across
/// differing window sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleFrame {
    pub index: u8,
    pub y: f64,
}

/// Authoritative ball state, normalized by the sender's viewport.
///
/// Position as a fraction of width/height, velocity likewise. Only the
/// host (session index 0) produces these; every other participant
/// overwrites its mirror with the latest frame, no interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallFrame {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// The current score, `[left, right]`. Written by the host only and
/// relayed as ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFrame {
    pub score: [u32; 2],
}

// ---------------------------------------------------------------------------
// ClientEvent — what a client sends to the server
// ---------------------------------------------------------------------------

/// Events sent by a client to the server.
///
/// `#[serde(tag = "type", rename_all = "camelCase")]` produces
/// internally tagged JSON matching the event catalog, e.g.:
///
/// ```json
/// { "type": "setUsername", "name": "Alice" }
/// { "type": "paddleMove", "index": 0, "y": 0.5 }
/// ```
///
/// The relay never inspects the gameplay payloads — they are decoded
/// only to know which kind they are, then forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Register a display name and attempt pairing.
    SetUsername { name: String },

    /// This client moved its own paddle.
    PaddleMove(PaddleFrame),

    /// Authoritative ball state (host only).
    BallUpdate(BallFrame),

    /// Score changed (host only).
    Score(ScoreFrame),
}

// ---------------------------------------------------------------------------
// ServerEvent — what the server sends to a client
// ---------------------------------------------------------------------------

/// Events sent by the server to a client.
///
/// Same internally tagged JSON shape as [`ClientEvent`]. Note the
/// deliberate asymmetry: an inbound `paddleMove` is forwarded to the
/// opponent as `opponentPaddleMove`, while `ballUpdate` and `score`
/// keep their tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Match formed. A client finds its own index by the position of
    /// its chosen name in `players` (fallback to 0 if not found).
    /// Index 0 is the first joiner and the authoritative simulator —
    /// a protocol invariant, not an accident of registration order.
    Start { players: [String; 2] },

    /// The opponent's paddle moved.
    OpponentPaddleMove(PaddleFrame),

    /// Authoritative ball state from the host.
    BallUpdate(BallFrame),

    /// Score change from the host.
    Score(ScoreFrame),

    /// The session was terminated by the peer disconnecting.
    OpponentLeft,
}

// =========================================================================
// Tests
// =========================================================================
