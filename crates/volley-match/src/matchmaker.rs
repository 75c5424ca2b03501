//! The matchmaker: a single waiting slot.
//!
//! Matchmaking here is deliberately minimal — there is no queue, no
//! ranking, no timeout. At most one participant waits at any time
//! (capacity invariant: 0 or 1). The next distinct registrant drains
//! the slot and the pair becomes a session.

use volley_protocol::ParticipantId;

/// A participant parked in the waiting slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waiting {
    /// Connection identity of the waiting participant.
    pub id: ParticipantId,
    /// The display name they registered with.
    pub name: String,
}

/// The outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No one was waiting (or the same connection re-registered):
    /// the registrant now holds the slot.
    Queued,

    /// A distinct participant was waiting; the slot is drained and
    /// the two should be seated in a session, `opponent` first.
    Paired { opponent: Waiting },
}

/// Holds at most one waiting participant and pairs incoming ones.
///
/// Names are arbitrary non-empty display strings; uniqueness is not
/// enforced. Self-pairing is prevented by comparing connection
/// identity, never names — two "Alice"s on different connections pair
/// fine, while one connection registering twice stays solely waiting.
#[derive(Debug, Default)]
pub struct Matchmaker {
    waiting: Option<Waiting>,
}

impl Matchmaker {
    /// Creates a matchmaker with an empty waiting slot.
    pub fn new() -> Self {
        Self { waiting: None }
    }

    /// Registers a display name for a participant.
    ///
    /// Pairs with the waiting participant if there is one and it is a
    /// different connection. A duplicate registration from the
    /// connection already waiting just updates the remembered name.
    pub fn register(
        &mut self,
        id: ParticipantId,
        name: &str,
    ) -> Registration {
        match self.waiting.take() {
            Some(opponent) if opponent.id != id => {
                tracing::debug!(
                    waiting = %opponent.id,
                    joiner = %id,
                    "waiting slot drained, pairing"
                );
                Registration::Paired { opponent }
            }
            _ => {
                // Empty slot, or the same connection re-registering.
                self.waiting = Some(Waiting {
                    id,
                    name: name.to_string(),
                });
                tracing::debug!(participant = %id, name, "participant waiting");
                Registration::Queued
            }
        }
    }

    /// Clears the slot if it is held by the given participant.
    ///
    /// Called on disconnect so a ghost never gets paired. Returns
    /// `true` if the slot was cleared.
    pub fn withdraw(&mut self, id: ParticipantId) -> bool {
        match &self.waiting {
            Some(w) if w.id == id => {
                self.waiting = None;
                tracing::debug!(participant = %id, "waiting slot cleared");
                true
            }
            _ => false,
        }
    }

    /// The participant currently waiting, if any.
    pub fn waiting(&self) -> Option<&Waiting> {
        self.waiting.as_ref()
    }
}

// =========================================================================
// Tests
// =========================================================================
