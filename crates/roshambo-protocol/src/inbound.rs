//! Inbound frame classification.
//!
//! The original relay dropped everything it didn't understand without
//! distinguishing why. That's fine for a cooperative client, but it hides
//! protocol violations. This module keeps the "drop silently, stay open"
//! behavior while telling the failure modes apart, so the session loop
//! can log an unparseable frame as a protocol error and an unrecognized
//! message type as routine noise.

use crate::types::CLIENT_MESSAGE_TYPES;
use crate::{ClientMessage, ProtocolError};

/// Parses a text frame into a [`ClientMessage`].
///
/// Classification order:
///
/// 1. Not valid JSON → [`ProtocolError::Malformed`].
/// 2. Valid JSON without a string `"type"` → [`ProtocolError::MissingType`].
/// 3. A `"type"` this server doesn't recognize →
///    [`ProtocolError::UnrecognizedType`] (safe to ignore).
/// 4. A recognized `"type"` whose body doesn't fit (e.g. an illegal move
///    string) → [`ProtocolError::InvalidBody`]. This is the gate that
///    keeps unrecognized moves out of the resolver.
///
/// None of these are fatal to the connection; the caller decides how
/// loudly to log each.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(ProtocolError::Malformed)?;

    let msg_type = match value.get("type").and_then(|t| t.as_str()) {
        Some(t) => t.to_string(),
        None => return Err(ProtocolError::MissingType),
    };

    if !CLIENT_MESSAGE_TYPES.contains(&msg_type.as_str()) {
        return Err(ProtocolError::UnrecognizedType(msg_type));
    }

    serde_json::from_value(value).map_err(ProtocolError::InvalidBody)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Move;

    #[test]
    fn test_parse_valid_move() {
        let msg = parse_client_message(r#"{"type":"move","move":"scissors"}"#)
            .unwrap();
        assert_eq!(msg, ClientMessage::Move { mv: Move::Scissors });
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_client_message("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_missing_type_discriminator() {
        let err = parse_client_message(r#"{"move":"rock"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingType));
    }

    #[test]
    fn test_non_string_type_is_missing_type() {
        let err = parse_client_message(r#"{"type":42}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingType));
    }

    #[test]
    fn test_unknown_type_is_unrecognized() {
        let err =
            parse_client_message(r#"{"type":"chat","text":"gl hf"}"#).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnrecognizedType(t) if t == "chat"
        ));
    }

    #[test]
    fn test_illegal_move_string_is_invalid_body() {
        // "lizard" is valid JSON under a recognized type, but the move
        // enum is closed — it must be rejected before any game logic.
        let err =
            parse_client_message(r#"{"type":"move","move":"lizard"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidBody(_)));
    }

    #[test]
    fn test_missing_move_field_is_invalid_body() {
        let err = parse_client_message(r#"{"type":"move"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidBody(_)));
    }
}
