//! Codec trait and implementations for serializing/deserializing events.
//!
//! A codec converts between Rust types and raw bytes. The protocol
//! layer doesn't care HOW events are serialized — it just needs
//! something that implements the [`Codec`] trait, so a binary codec
//! can be swapped in later without touching any other layer.
//!
//! Currently we provide [`JsonCodec`]: human-readable, inspectable in
//! browser DevTools, and directly consumable by a JavaScript client.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec is shared across Tokio
/// tasks and lives as long as the server. The methods are generic over
/// any serde-capable type; `DeserializeOwned` (rather than plain
/// `Deserialize`) means the decoded value owns its data, so the input
/// buffer can be dropped immediately.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use volley_protocol::{Codec, ClientEvent, JsonCodec};
///
/// let codec = JsonCodec;
/// let event = ClientEvent::SetUsername { name: "Alice".into() };
///
/// let bytes = codec.encode(&event).unwrap();
/// let decoded: ClientEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(event, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{BallFrame, ServerEvent};

    #[test]
    fn test_json_codec_round_trips_server_event() {
        let codec = JsonCodec;
        let event = ServerEvent::BallUpdate(BallFrame {
            x: 0.25,
            y: 0.75,
            vx: 0.0125,
            vy: -0.01,
        });

        let bytes = codec.encode(&event).unwrap();
        let decoded: ServerEvent = codec.decode(&bytes).unwrap();

        assert_eq!(event, decoded);
    }

    #[test]
    fn test_json_codec_decode_failure_is_decode_error() {
        let codec = JsonCodec;
        let result: Result<ServerEvent, _> = codec.decode(b"{{{");

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
