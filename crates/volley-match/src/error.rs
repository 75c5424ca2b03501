//! Error types for the match layer.

use volley_protocol::{ParticipantId, SessionId};

/// Errors that can occur during session registry operations.
///
/// These never reach a client: the routing layer resolves every
/// inbound-event failure as a silent drop. They exist so registry
/// misuse inside the server is a typed, loggable condition rather
/// than a silent inconsistency.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The session does not exist.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The participant is already seated in a session.
    #[error("participant {0} already in session {1}")]
    AlreadyPaired(ParticipantId, SessionId),

    /// Both seats of a session would be held by the same connection.
    #[error("participant {0} cannot be paired with itself")]
    SelfPair(ParticipantId),
}
