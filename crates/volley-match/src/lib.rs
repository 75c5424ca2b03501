//! Matchmaking and session lifecycle for Volley.
//!
//! This crate is the server's pairing/relay state machine:
//!
//! 1. **Matchmaking** — a single waiting slot; the second registrant
//!    is paired with whoever is waiting ([`Matchmaker`])
//! 2. **Sessions** — the canonical ordered pair of participants plus a
//!    keyed membership index ([`Session`], [`SessionRegistry`])
//! 3. **Routing** — one inbound event in, a list of deliveries out
//!    ([`Lobby`])
//!
//! # Concurrency note
//!
//! Nothing in this crate is thread-safe by itself — plain `HashMap`s
//! and `Option`s, no locks. This is intentional: every operation is a
//! synchronous, non-awaiting step, and the server wraps the [`Lobby`]
//! in a single mutex at a higher level. Keeping it pure here makes the
//! pairing rules trivially testable.

mod error;
mod lobby;
mod matchmaker;
mod session;

pub use error::MatchError;
pub use lobby::{Delivery, Lobby};
pub use matchmaker::{Matchmaker, Registration, Waiting};
pub use session::{Seat, Session, SessionRegistry};
