//! `WebSocket` protocol for the broadcast hub.
//!
//! Inbound frames are JSON envelopes `{"type": ..., "payload": ...}`. They
//! are decoded once, at the connection boundary, into a [`ClientMessage`];
//! anything the hub does not understand becomes a [`ProtocolError`] that is
//! answered to the sender only.
//!
//! Outbound frames are [`ServerMessage`] values, internally tagged by
//! `type`:
//!
//! ```text
//! {"type":"hello","msg":"connected"}
//! {"type":"subscribed","payload":<echo>}
//! {"type":"order_update","order_id":..,"robot_id":..,"node":..,"progress":..,"speed":..,"state":..}
//! {"type":"error","code":"validation_error","msg":..}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::RobotState;
use crate::ids::{NodeId, OrderId, RobotId};
use crate::structs::Telemetry;

/// Errors reported back to the sending connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The frame or its payload does not have the expected shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// The envelope names a message type the hub does not handle.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),
}

impl ProtocolError {
    /// Machine-readable code for this error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::UnknownMessageType(_) => ErrorCode::UnknownMessageType,
        }
    }

    /// Build the error frame sent to the offending connection.
    pub fn to_message(&self) -> ServerMessage {
        ServerMessage::Error {
            code: self.code(),
            msg: self.to_string(),
        }
    }
}

/// Machine-readable error codes carried in [`ServerMessage::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed frame or telemetry payload.
    ValidationError,
    /// Unrecognised message category.
    UnknownMessageType,
}

/// Raw envelope shared by every inbound frame.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Robot telemetry. Field ranges are not yet checked; see
    /// [`validator::Validate`] on [`Telemetry`].
    Telemetry(Telemetry),
    /// Subscription request with an opaque payload echoed back.
    Subscribe(Value),
}

impl ClientMessage {
    /// Decode a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Validation`] for frames that are not JSON
    /// objects with a string `type`, or whose telemetry payload is missing
    /// fields; [`ProtocolError::UnknownMessageType`] for any other `type`.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(text)
            .map_err(|e| ProtocolError::Validation(format!("invalid frame: {e}")))?;

        match envelope.kind.as_str() {
            "telemetry" => {
                let telemetry: Telemetry = serde_json::from_value(envelope.payload)
                    .map_err(|e| ProtocolError::Validation(format!("invalid telemetry: {e}")))?;
                Ok(Self::Telemetry(telemetry))
            }
            "subscribe" => Ok(Self::Subscribe(envelope.payload)),
            _ => Err(ProtocolError::UnknownMessageType(envelope.kind)),
        }
    }
}

/// An outbound frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Greeting sent when a connection joins the hub.
    Hello {
        /// Human-readable greeting.
        msg: String,
    },
    /// Acknowledgement of a `subscribe` frame.
    Subscribed {
        /// The payload of the `subscribe` frame, echoed verbatim.
        payload: Value,
    },
    /// Order progress derived from accepted telemetry, sent to every subscriber.
    OrderUpdate {
        /// Order the report refers to.
        order_id: OrderId,
        /// Reporting robot.
        robot_id: RobotId,
        /// Current node.
        node: NodeId,
        /// Fraction of the route completed.
        progress: f64,
        /// Current speed in cm/s.
        speed: f64,
        /// Reported lifecycle state.
        state: RobotState,
    },
    /// Error returned to the sender of a rejected frame.
    Error {
        /// Machine-readable code.
        code: ErrorCode,
        /// Human-readable description.
        msg: String,
    },
}

impl ServerMessage {
    /// The greeting frame.
    pub fn hello() -> Self {
        Self::Hello {
            msg: String::from("connected"),
        }
    }

    /// Build the broadcast event for an accepted telemetry report.
    pub fn order_update(telemetry: &Telemetry) -> Self {
        Self::OrderUpdate {
            order_id: telemetry.order_id.clone(),
            robot_id: telemetry.robot_id.clone(),
            node: telemetry.node.clone(),
            progress: telemetry.progress,
            speed: telemetry.speed,
            state: telemetry.state,
        }
    }

    /// Serialize to the JSON text sent over the socket.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn decodes_telemetry_frame() {
        let frame = r#"{"type":"telemetry","payload":{"robot_id":"R1","order_id":"O1","node":"A","progress":0.2,"speed":11.5,"state":"ASSIGNED"}}"#;
        let ClientMessage::Telemetry(t) = ClientMessage::decode(frame).unwrap() else {
            panic!("expected telemetry");
        };
        assert_eq!(t.robot_id.as_str(), "R1");
        assert_eq!(t.state, RobotState::Assigned);
    }

    #[test]
    fn telemetry_state_defaults_to_moving() {
        let frame = r#"{"type":"telemetry","payload":{"robot_id":"R1","order_id":"O1","node":"A","progress":0.2,"speed":11.5}}"#;
        let ClientMessage::Telemetry(t) = ClientMessage::decode(frame).unwrap() else {
            panic!("expected telemetry");
        };
        assert_eq!(t.state, RobotState::Moving);
    }

    #[test]
    fn telemetry_missing_field_is_validation_error() {
        let frame = r#"{"type":"telemetry","payload":{"robot_id":"R1","node":"A","progress":0.2,"speed":1.0}}"#;
        let err = ClientMessage::decode(frame).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn subscribe_payload_is_opaque() {
        let frame = r#"{"type":"subscribe","payload":{"orders":["O1"]}}"#;
        let msg = ClientMessage::decode(frame).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Subscribe(serde_json::json!({"orders": ["O1"]}))
        );
    }

    #[test]
    fn subscribe_without_payload_echoes_null() {
        let msg = ClientMessage::decode(r#"{"type":"subscribe"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Subscribe(Value::Null));
    }

    #[test]
    fn unknown_type_is_reported() {
        let err = ClientMessage::decode(r#"{"type":"dance","payload":{}}"#).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownMessageType(String::from("dance")));
    }

    #[test]
    fn non_json_is_validation_error() {
        let err = ClientMessage::decode("hello there").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        let err = ClientMessage::decode(r#"{"payload":{}}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn order_update_wire_shape() {
        let t = Telemetry {
            robot_id: RobotId::from("R1"),
            order_id: OrderId::from("O1"),
            node: NodeId::from("C"),
            progress: 1.0,
            speed: 12.0,
            state: RobotState::Arrived,
        };
        let json: Value = serde_json::from_str(&ServerMessage::order_update(&t).to_json().unwrap())
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "order_update",
                "order_id": "O1",
                "robot_id": "R1",
                "node": "C",
                "progress": 1.0,
                "speed": 12.0,
                "state": "ARRIVED",
            })
        );
    }

    #[test]
    fn error_frame_shape() {
        let err = ProtocolError::UnknownMessageType(String::from("x"));
        let json = serde_json::to_value(err.to_message()).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "unknown_message_type");
    }
}
