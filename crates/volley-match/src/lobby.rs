//! The lobby: one inbound event in, a list of deliveries out.
//!
//! `Lobby` glues the matchmaker, the session registry, and the relay
//! rules into a single synchronous state machine. Each operation is an
//! atomic, non-blocking step — no I/O, no awaiting — that returns the
//! events to deliver and to whom. The server performs the actual
//! network sends after releasing its lock on the lobby.
//!
//! Every failure mode here is "ignore and continue": events from
//! unregistered participants, relays after teardown, and duplicate
//! registrations are dropped at this layer with a debug log, never
//! surfaced to a client.

use volley_protocol::{ClientEvent, ParticipantId, ServerEvent};

use crate::{Matchmaker, Registration, Seat, SessionRegistry};

/// An outbound event addressed to one participant.
pub type Delivery = (ParticipantId, ServerEvent);

/// The server's complete pairing/relay state.
#[derive(Debug, Default)]
pub struct Lobby {
    matchmaker: Matchmaker,
    registry: SessionRegistry,
}

impl Lobby {
    /// Creates an empty lobby.
    pub fn new() -> Self {
        Self {
            matchmaker: Matchmaker::new(),
            registry: SessionRegistry::new(),
        }
    }

    /// Handles a `setUsername` registration.
    ///
    /// Queues the participant, or pairs them with the waiting one and
    /// returns a `start` delivery for both seats (first joiner listed
    /// first — that order elects the host).
    pub fn register(
        &mut self,
        id: ParticipantId,
        name: &str,
    ) -> Vec<Delivery> {
        if name.is_empty() {
            tracing::debug!(participant = %id, "empty name, ignoring");
            return Vec::new();
        }
        if self.registry.session_of(id).is_some() {
            tracing::debug!(
                participant = %id,
                "register while paired, ignoring"
            );
            return Vec::new();
        }

        match self.matchmaker.register(id, name) {
            Registration::Queued => Vec::new(),
            Registration::Paired { opponent } => {
                let first = Seat {
                    id: opponent.id,
                    name: opponent.name,
                };
                let second = Seat {
                    id,
                    name: name.to_string(),
                };
                let session = match self.registry.create(first, second) {
                    Ok(session) => session,
                    Err(e) => {
                        // Registry misuse — cannot happen through this
                        // path, but a dropped pair beats a panic.
                        tracing::warn!(error = %e, "pairing failed");
                        return Vec::new();
                    }
                };

                let players = session.player_names();
                tracing::info!(
                    session_id = %session.id(),
                    host = %session.host(),
                    players = ?players,
                    "match started"
                );
                vec![
                    (
                        session.host(),
                        ServerEvent::Start {
                            players: players.clone(),
                        },
                    ),
                    (id, ServerEvent::Start { players }),
                ]
            }
        }
    }

    /// Relays a gameplay event to the sender's opponent.
    ///
    /// Forwards the payload unchanged — no validation, no rate
    /// limiting — iff the sender currently belongs to an active
    /// (non-terminal) session. Paddle frames are re-tagged
    /// `opponentPaddleMove` on the way out. Everything else is a
    /// protocol-level no-op.
    pub fn relay(
        &mut self,
        sender: ParticipantId,
        event: ClientEvent,
    ) -> Vec<Delivery> {
        let outbound = match event {
            ClientEvent::PaddleMove(frame) => {
                ServerEvent::OpponentPaddleMove(frame)
            }
            ClientEvent::BallUpdate(frame) => ServerEvent::BallUpdate(frame),
            ClientEvent::Score(frame) => ServerEvent::Score(frame),
            ClientEvent::SetUsername { .. } => {
                // Registration is not a relay kind.
                return Vec::new();
            }
        };

        let Some(session) = self.registry.session_of(sender) else {
            tracing::debug!(
                participant = %sender,
                "relay without active session, dropping"
            );
            return Vec::new();
        };
        if session.is_terminal() {
            return Vec::new();
        }

        match session.opponent_of(sender) {
            Some(opponent) => vec![(opponent, outbound)],
            None => Vec::new(),
        }
    }

    /// Handles a participant disconnecting, in any state.
    ///
    /// Clears the waiting slot if they held it; tears down their
    /// session if they were paired, notifying the survivor with
    /// exactly one `opponentLeft`. Never leaves anything dangling.
    pub fn disconnect(&mut self, id: ParticipantId) -> Vec<Delivery> {
        self.matchmaker.withdraw(id);

        let Ok(session) = self.registry.close_for(id) else {
            // Was never paired — nothing to notify.
            return Vec::new();
        };

        tracing::info!(
            session_id = %session.id(),
            participant = %id,
            "participant left mid-match"
        );
        match session.opponent_of(id) {
            Some(survivor) => vec![(survivor, ServerEvent::OpponentLeft)],
            None => Vec::new(),
        }
    }

    /// The participant currently waiting for a match, if any.
    pub fn waiting(&self) -> Option<ParticipantId> {
        self.matchmaker.waiting().map(|w| w.id)
    }

    /// Number of active sessions.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use volley_protocol::{BallFrame, PaddleFrame, ScoreFrame};

    fn pid(id: u64) -> ParticipantId {
        ParticipantId(id)
    }

    fn paddle(index: u8, y: f64) -> ClientEvent {
        ClientEvent::PaddleMove(PaddleFrame { index, y })
    }

    /// Registers Alice then Bob; returns their ids.
    fn paired_lobby() -> (Lobby, ParticipantId, ParticipantId) {
        let mut lobby = Lobby::new();
        assert!(lobby.register(pid(1), "Alice").is_empty());
        let started = lobby.register(pid(2), "Bob");
        assert_eq!(started.len(), 2);
        (lobby, pid(1), pid(2))
    }

    #[test]
    fn test_register_pairs_in_order_and_notifies_both() {
        let mut lobby = Lobby::new();

        // X receives no start until Y registers.
        let first = lobby.register(pid(1), "Alice");
        assert!(first.is_empty());

        let started = lobby.register(pid(2), "Bob");

        let expected = ServerEvent::Start {
            players: ["Alice".to_string(), "Bob".to_string()],
        };
        assert_eq!(
            started,
            vec![(pid(1), expected.clone()), (pid(2), expected)]
        );
    }

    #[test]
    fn test_third_connection_cannot_join_existing_session() {
        let (mut lobby, _a, _b) = paired_lobby();

        // Carol starts a fresh wait; the existing session is untouched.
        let outcome = lobby.register(pid(3), "Carol");

        assert!(outcome.is_empty());
        assert_eq!(lobby.session_count(), 1);
        assert_eq!(lobby.waiting(), Some(pid(3)));
    }

    #[test]
    fn test_duplicate_register_stays_solely_waiting() {
        let mut lobby = Lobby::new();
        lobby.register(pid(1), "Alice");

        let outcome = lobby.register(pid(1), "Alice");

        assert!(outcome.is_empty());
        assert_eq!(lobby.waiting(), Some(pid(1)));
        assert_eq!(lobby.session_count(), 0);
    }

    #[test]
    fn test_register_with_empty_name_is_dropped() {
        let mut lobby = Lobby::new();

        assert!(lobby.register(pid(1), "").is_empty());
        assert_eq!(lobby.waiting(), None);
    }

    #[test]
    fn test_register_while_paired_is_a_noop() {
        let (mut lobby, a, _b) = paired_lobby();

        let outcome = lobby.register(a, "AliceAgain");

        assert!(outcome.is_empty());
        assert_eq!(lobby.waiting(), None, "paired register must not queue");
    }

    #[test]
    fn test_relay_paddle_reaches_only_opponent_retagged() {
        let (mut lobby, a, b) = paired_lobby();

        let deliveries = lobby.relay(a, paddle(0, 0.5));

        assert_eq!(
            deliveries,
            vec![(
                b,
                ServerEvent::OpponentPaddleMove(PaddleFrame {
                    index: 0,
                    y: 0.5
                })
            )]
        );
    }

    #[test]
    fn test_relay_ball_and_score_keep_their_kind() {
        let (mut lobby, a, b) = paired_lobby();

        let ball = BallFrame {
            x: 0.5,
            y: 0.5,
            vx: 0.01,
            vy: 0.0,
        };
        let deliveries = lobby.relay(a, ClientEvent::BallUpdate(ball));
        assert_eq!(deliveries, vec![(b, ServerEvent::BallUpdate(ball))]);

        let score = ScoreFrame { score: [1, 0] };
        let deliveries = lobby.relay(a, ClientEvent::Score(score));
        assert_eq!(deliveries, vec![(b, ServerEvent::Score(score))]);
    }

    #[test]
    fn test_relay_payload_forwarded_unchanged() {
        // The relay must not inspect or normalize payloads — even
        // out-of-range values pass through verbatim.
        let (mut lobby, a, b) = paired_lobby();

        let deliveries = lobby.relay(a, paddle(9, -3.5));

        assert_eq!(
            deliveries,
            vec![(
                b,
                ServerEvent::OpponentPaddleMove(PaddleFrame {
                    index: 9,
                    y: -3.5
                })
            )]
        );
    }

    #[test]
    fn test_relay_without_session_is_dropped() {
        let mut lobby = Lobby::new();

        // Never registered.
        assert!(lobby.relay(pid(9), paddle(0, 0.1)).is_empty());

        // Registered but still waiting.
        lobby.register(pid(1), "Alice");
        assert!(lobby.relay(pid(1), paddle(0, 0.1)).is_empty());
    }

    #[test]
    fn test_disconnect_of_waiting_participant_clears_slot() {
        let mut lobby = Lobby::new();
        lobby.register(pid(1), "Alice");

        let deliveries = lobby.disconnect(pid(1));

        assert!(deliveries.is_empty());
        assert_eq!(lobby.waiting(), None);

        // The next two registrants pair with each other, not a ghost.
        lobby.register(pid(2), "Bob");
        let started = lobby.register(pid(3), "Carol");
        match &started[0].1 {
            ServerEvent::Start { players } => {
                assert_eq!(players, &["Bob".to_string(), "Carol".to_string()]);
            }
            other => panic!("expected Start, got {other:?}"),
        }
    }

    #[test]
    fn test_disconnect_mid_match_notifies_survivor_once() {
        let (mut lobby, a, b) = paired_lobby();

        let deliveries = lobby.disconnect(a);

        assert_eq!(deliveries, vec![(b, ServerEvent::OpponentLeft)]);
        assert_eq!(lobby.session_count(), 0);

        // A second disconnect (e.g. the survivor leaving) produces
        // nothing — the notification fires exactly once.
        assert!(lobby.disconnect(b).is_empty());
    }

    #[test]
    fn test_no_relay_after_session_termination() {
        let (mut lobby, a, b) = paired_lobby();
        lobby.disconnect(a);

        // The survivor's traffic goes nowhere.
        assert!(lobby.relay(b, paddle(1, 0.9)).is_empty());
        assert!(
            lobby
                .relay(b, ClientEvent::Score(ScoreFrame { score: [0, 1] }))
                .is_empty()
        );
    }

    #[test]
    fn test_disconnect_of_unknown_participant_is_a_noop() {
        let mut lobby = Lobby::new();
        assert!(lobby.disconnect(pid(42)).is_empty());
    }

    #[test]
    fn test_survivor_can_requeue_after_opponent_left() {
        let (mut lobby, a, b) = paired_lobby();
        lobby.disconnect(a);

        // The survivor registers again and pairs with a newcomer.
        assert!(lobby.register(b, "Bob").is_empty());
        let started = lobby.register(pid(3), "Dana");

        assert_eq!(started.len(), 2);
        assert_eq!(started[0].0, b, "survivor is host of the new session");
    }
}
