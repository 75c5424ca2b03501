//! Client-side simulation and state mirroring for Volley.
//!
//! The relay server never simulates anything — it only forwards
//! frames. The actual game runs inside the clients, and this crate is
//! that logic:
//!
//! - **Host authority**: the participant at session index 0 (the
//!   first joiner) is the sole simulator of ball physics and the sole
//!   writer of the score. This is a protocol invariant, not an
//!   accident of registration order — it avoids conflicting authority
//!   and double simulation.
//! - **Mirroring**: every other participant overwrites its local
//!   state with the latest received frame. No interpolation, no
//!   reconciliation, no smoothing; last message wins.
//! - **Normalization**: all wire frames are fractions of the sender's
//!   viewport, so clients with different window sizes stay in sync.
//!
//! The crate is pure and synchronous — no I/O, no clocks. Embedders
//! drive [`GameClient`] from their own render loop and ship the
//! returned events over whatever transport they use.

mod ball;
mod client;
mod config;

pub use ball::{Ball, Side, serve, step};
pub use client::GameClient;
pub use config::{SimConfig, Viewport};
