//! Wire messages exchanged with playground clients.
//!
//! One JSON object per WebSocket text frame. The inbound side accepts only
//! `{"type": "run", "code": ...}`; any other `type` value fails
//! deserialization and is answered with an error reply before the pipeline is
//! ever involved.

use crucible_core::RunResult;
use serde::{Deserialize, Serialize};

/// Messages a client may send.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Run { code: String },
}

/// Messages sent back to the client, exactly one per inbound message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Execution { data: String },
    Error { data: String },
}

impl ServerMessage {
    pub fn error(data: impl Into<String>) -> Self {
        ServerMessage::Error { data: data.into() }
    }

    /// Encode for the wire. Serialization of these variants cannot fail, but
    /// the reply-per-request contract still gets a fallback rather than a
    /// panic.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("failed to encode outbound message: {}", e);
            r#"{"type":"error","data":"internal encoding failure"}"#.to_string()
        })
    }
}

impl From<RunResult> for ServerMessage {
    fn from(result: RunResult) -> Self {
        match result {
            RunResult::Execution { data } => ServerMessage::Execution { data },
            RunResult::Error { data } => ServerMessage::Error { data },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_message_parses() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type": "run", "code": "int main() {}"}"#).unwrap();
        assert_eq!(
            parsed,
            ClientMessage::Run {
                code: "int main() {}".to_string()
            }
        );
    }

    #[test]
    fn unsupported_type_is_rejected() {
        let parsed = serde_json::from_str::<ClientMessage>(r#"{"type": "stop", "code": ""}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_code_is_rejected() {
        let parsed = serde_json::from_str::<ClientMessage>(r#"{"type": "run"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn replies_encode_with_the_wire_tag() {
        let reply = ServerMessage::Execution {
            data: "hello\n".to_string(),
        };
        assert_eq!(reply.to_json(), r#"{"type":"execution","data":"hello\n"}"#);

        let reply = ServerMessage::error("bad request");
        assert_eq!(reply.to_json(), r#"{"type":"error","data":"bad request"}"#);
    }

    #[test]
    fn run_results_map_onto_wire_replies() {
        let reply: ServerMessage = RunResult::execution("out").into();
        assert_eq!(
            reply,
            ServerMessage::Execution {
                data: "out".to_string()
            }
        );
        let reply: ServerMessage = RunResult::error("diag").into();
        assert_eq!(reply, ServerMessage::error("diag"));
    }
}
