//! Unified error type for the Volley server.

use volley_match::MatchError;
use volley_protocol::ProtocolError;
use volley_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `volley` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum VolleyError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid event).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A match-layer error (registry misuse).
    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_protocol::ParticipantId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let volley_err: VolleyError = err.into();
        assert!(matches!(volley_err, VolleyError::Transport(_)));
        assert!(volley_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidEvent("bad".into());
        let volley_err: VolleyError = err.into();
        assert!(matches!(volley_err, VolleyError::Protocol(_)));
    }

    #[test]
    fn test_from_match_error() {
        let err = MatchError::SelfPair(ParticipantId(1));
        let volley_err: VolleyError = err.into();
        assert!(matches!(volley_err, VolleyError::Match(_)));
    }
}
