//! Session types: the canonical record of one active match.
//!
//! A session always holds exactly two seats from the moment it is
//! created — it is never created half-full, and teardown is logical
//! (terminal flag, registry removal), never a one-seat session.
//!
//! Lookups from participant to session go through the registry's
//! keyed membership index. Participants hold no back-references to
//! their session or opponent; the registry owns all the wiring.

use std::collections::HashMap;

use volley_protocol::{ParticipantId, SessionId};

use crate::MatchError;

// ---------------------------------------------------------------------------
// Seat / Session
// ---------------------------------------------------------------------------

/// One side of a session: a participant and their display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: ParticipantId,
    pub name: String,
}

/// One active two-player match.
///
/// Seat order is a protocol invariant: index 0 is the first joiner
/// and the authoritative simulator ("host"), index 1 the second
/// joiner. Clients derive their own index from the `start` event's
/// name order, so the registry must preserve it exactly.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    seats: [Seat; 2],
    terminal: bool,
}

impl Session {
    fn new(id: SessionId, first: Seat, second: Seat) -> Self {
        Self {
            id,
            seats: [first, second],
            terminal: false,
        }
    }

    /// The session's unique ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The seat index of a participant (0 = host), or `None` if they
    /// are not part of this session.
    pub fn index_of(&self, id: ParticipantId) -> Option<usize> {
        self.seats.iter().position(|seat| seat.id == id)
    }

    /// The other participant in the session.
    pub fn opponent_of(&self, id: ParticipantId) -> Option<ParticipantId> {
        self.index_of(id).map(|idx| self.seats[1 - idx].id)
    }

    /// The authoritative simulator (seat 0).
    pub fn host(&self) -> ParticipantId {
        self.seats[0].id
    }

    /// Display names in seat order, as sent in the `start` event.
    pub fn player_names(&self) -> [String; 2] {
        [self.seats[0].name.clone(), self.seats[1].name.clone()]
    }

    /// Whether the session has been torn down. No relay traffic is
    /// forwarded for a terminal session.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

/// Owns all active sessions and the participant → session index.
///
/// Invariants:
/// - a participant appears in at most one session;
/// - `membership` and `sessions` stay in sync — every seated
///   participant has a membership entry and vice versa.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    membership: HashMap<ParticipantId, SessionId>,
    next_id: u64,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            membership: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a session seating `first` and `second` in that order.
    ///
    /// # Errors
    /// - [`MatchError::SelfPair`] if both seats are the same connection
    /// - [`MatchError::AlreadyPaired`] if either participant is
    ///   already seated somewhere
    pub fn create(
        &mut self,
        first: Seat,
        second: Seat,
    ) -> Result<&Session, MatchError> {
        if first.id == second.id {
            return Err(MatchError::SelfPair(first.id));
        }
        for seat in [&first, &second] {
            if let Some(existing) = self.membership.get(&seat.id) {
                return Err(MatchError::AlreadyPaired(seat.id, *existing));
            }
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;

        self.membership.insert(first.id, id);
        self.membership.insert(second.id, id);
        let session = Session::new(id, first, second);
        tracing::info!(
            session_id = %id,
            host = %session.host(),
            "session created"
        );
        self.sessions.insert(id, session);

        Ok(self.sessions.get(&id).expect("just inserted"))
    }

    /// Looks up the session a participant is seated in.
    pub fn session_of(&self, id: ParticipantId) -> Option<&Session> {
        self.membership
            .get(&id)
            .and_then(|sid| self.sessions.get(sid))
    }

    /// Looks up a session by its ID.
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Tears down the session a participant belongs to.
    ///
    /// Marks it terminal, unlinks both membership entries, and removes
    /// the record. Returns the closed session so the caller can notify
    /// the survivor.
    ///
    /// # Errors
    /// Returns [`MatchError::NotFound`] if the participant is not in
    /// any session.
    pub fn close_for(
        &mut self,
        id: ParticipantId,
    ) -> Result<Session, MatchError> {
        let sid = self
            .membership
            .get(&id)
            .copied()
            .ok_or(MatchError::NotFound(SessionId(0)))?;
        let mut session = self
            .sessions
            .remove(&sid)
            .ok_or(MatchError::NotFound(sid))?;

        session.terminal = true;
        for seat in &session.seats {
            self.membership.remove(&seat.id);
        }

        tracing::info!(session_id = %sid, "session closed");
        Ok(session)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// `true` if there are no active sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: u64, name: &str) -> Seat {
        Seat {
            id: ParticipantId(id),
            name: name.to_string(),
        }
    }

    fn pid(id: u64) -> ParticipantId {
        ParticipantId(id)
    }

    #[test]
    fn test_create_seats_pair_in_join_order() {
        let mut reg = SessionRegistry::new();

        let session = reg
            .create(seat(1, "Alice"), seat(2, "Bob"))
            .expect("should create");

        assert_eq!(session.index_of(pid(1)), Some(0));
        assert_eq!(session.index_of(pid(2)), Some(1));
        assert_eq!(session.host(), pid(1));
        assert_eq!(
            session.player_names(),
            ["Alice".to_string(), "Bob".to_string()]
        );
        assert!(!session.is_terminal());
    }

    #[test]
    fn test_create_rejects_self_pair() {
        let mut reg = SessionRegistry::new();

        let result = reg.create(seat(1, "Alice"), seat(1, "Alice"));

        assert!(matches!(result, Err(MatchError::SelfPair(p)) if p == pid(1)));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_create_rejects_already_seated_participant() {
        let mut reg = SessionRegistry::new();
        reg.create(seat(1, "Alice"), seat(2, "Bob")).unwrap();

        let result = reg.create(seat(2, "Bob"), seat(3, "Carol"));

        assert!(matches!(
            result,
            Err(MatchError::AlreadyPaired(p, _)) if p == pid(2)
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_opponent_lookup_both_directions() {
        let mut reg = SessionRegistry::new();
        reg.create(seat(1, "Alice"), seat(2, "Bob")).unwrap();

        let session = reg.session_of(pid(1)).unwrap();
        assert_eq!(session.opponent_of(pid(1)), Some(pid(2)));
        assert_eq!(session.opponent_of(pid(2)), Some(pid(1)));
        assert_eq!(session.opponent_of(pid(3)), None);
    }

    #[test]
    fn test_session_of_unknown_participant_is_none() {
        let reg = SessionRegistry::new();
        assert!(reg.session_of(pid(99)).is_none());
    }

    #[test]
    fn test_close_for_unlinks_both_participants() {
        let mut reg = SessionRegistry::new();
        reg.create(seat(1, "Alice"), seat(2, "Bob")).unwrap();

        let closed = reg.close_for(pid(1)).expect("should close");

        assert!(closed.is_terminal());
        assert_eq!(closed.opponent_of(pid(1)), Some(pid(2)));
        // Neither former participant resolves to a session any more.
        assert!(reg.session_of(pid(1)).is_none());
        assert!(reg.session_of(pid(2)).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_close_for_unknown_participant_errors() {
        let mut reg = SessionRegistry::new();

        let result = reg.close_for(pid(7));

        assert!(matches!(result, Err(MatchError::NotFound(_))));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let mut reg = SessionRegistry::new();
        let a = reg.create(seat(1, "a"), seat(2, "b")).unwrap().id();
        let b = reg.create(seat(3, "c"), seat(4, "d")).unwrap().id();

        assert_ne!(a, b);
    }

    #[test]
    fn test_participants_reusable_after_close() {
        // A participant whose session closed can be seated again
        // (fresh connection semantics are handled above this layer,
        // but the registry itself must not hold stale membership).
        let mut reg = SessionRegistry::new();
        reg.create(seat(1, "Alice"), seat(2, "Bob")).unwrap();
        reg.close_for(pid(2)).unwrap();

        let session = reg.create(seat(1, "Alice"), seat(3, "Carol")).unwrap();
        assert_eq!(session.index_of(pid(1)), Some(0));
    }
}
