//! Frame Codec
//!
//! Decodes inbound push-channel frames. Each frame is UTF-8 text
//! holding one JSON object with a `type` discriminator; the codec maps
//! it to a [`Notification`] variant. A frame that fails to decode is an
//! error local to that frame: the caller logs and drops it without
//! touching the connection.

use crate::domain::notification::{Notification, NotificationKind};

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Frame is not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame is valid JSON but not an object.
    #[error("expected a JSON object, got: {0}")]
    NotAnObject(String),

    /// Frame has no `type` field.
    #[error("frame has no `type` field")]
    MissingKind,

    /// Frame `type` is not a recognized notification kind.
    #[error("unrecognized notification kind: {0}")]
    UnknownKind(String),
}

/// JSON codec for the push channel.
#[derive(Debug, Default, Clone)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode a text frame into a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not a JSON object, lacks a
    /// `type` field, or names a kind outside the recognized set.
    /// Payload fields beyond `type` are optional; their absence never
    /// fails decoding.
    pub fn decode(&self, text: &str) -> Result<Notification, CodecError> {
        let value: serde_json::Value = serde_json::from_str(text.trim())?;

        let Some(object) = value.as_object() else {
            let preview: String = text.trim().chars().take(50).collect();
            return Err(CodecError::NotAnObject(preview));
        };

        let kind = object
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(CodecError::MissingKind)?;

        if NotificationKind::from_wire(kind).is_none() {
            return Err(CodecError::UnknownKind(kind.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_position_created_with_payload() {
        let codec = JsonCodec::new();
        let frame = r#"{
            "type": "position_created",
            "data": {
                "id": 7,
                "orderId": "ord-7",
                "exchange": "bybit",
                "symbol": "ETHUSDT",
                "cumExitValue": 310.5,
                "qty": 1.5,
                "leverage": 5,
                "closedPnl": 12.25,
                "side": "Sell",
                "date": "2025-07-01T09:30:00Z"
            }
        }"#;

        let notification = codec.decode(frame).unwrap();
        assert_eq!(notification.kind(), NotificationKind::PositionCreated);

        match notification {
            Notification::PositionCreated { position } => {
                let position = position.unwrap();
                assert_eq!(position.id, 7);
                assert_eq!(position.symbol, "ETHUSDT");
            }
            other => panic!("expected PositionCreated, got {other:?}"),
        }
    }

    #[test]
    fn decode_deleted_kinds_carry_ids() {
        let codec = JsonCodec::new();

        let n = codec
            .decode(r#"{"type":"position_deleted","positionId":7}"#)
            .unwrap();
        assert_eq!(
            n,
            Notification::PositionDeleted {
                position_id: Some(7)
            }
        );

        let n = codec
            .decode(r#"{"type":"monthly_income_deleted","incomeId":12}"#)
            .unwrap();
        assert_eq!(
            n,
            Notification::MonthlyIncomeDeleted {
                income_id: Some(12)
            }
        );
    }

    #[test]
    fn decode_positions_update_sync() {
        let codec = JsonCodec::new();
        let frame = r#"{"type":"positions_update","positions":[],"count":0,"exchange":"gate"}"#;

        match codec.decode(frame).unwrap() {
            Notification::PositionsUpdate {
                positions,
                count,
                exchange,
            } => {
                assert_eq!(positions, Some(vec![]));
                assert_eq!(count, Some(0));
                assert_eq!(exchange.as_deref(), Some("gate"));
            }
            other => panic!("expected PositionsUpdate, got {other:?}"),
        }
    }

    #[test]
    fn non_json_frame_is_rejected() {
        let codec = JsonCodec::new();
        assert!(matches!(
            codec.decode("not json"),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn object_without_type_is_rejected() {
        let codec = JsonCodec::new();
        assert!(matches!(
            codec.decode(r#"{"nope": true}"#),
            Err(CodecError::MissingKind)
        ));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let codec = JsonCodec::new();
        assert!(matches!(
            codec.decode("[1,2,3]"),
            Err(CodecError::NotAnObject(_))
        ));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let codec = JsonCodec::new();
        match codec.decode(r#"{"type":"balance_update"}"#) {
            Err(CodecError::UnknownKind(kind)) => assert_eq!(kind, "balance_update"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_payload_fields_are_ignored() {
        let codec = JsonCodec::new();
        let n = codec
            .decode(r#"{"type":"withdrawal_deleted","withdrawalId":3,"extra":"x"}"#)
            .unwrap();
        assert_eq!(
            n,
            Notification::WithdrawalDeleted {
                withdrawal_id: Some(3)
            }
        );
    }
}
