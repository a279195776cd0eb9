//! JSON frames sent from the server over the realtime channel.

use serde::Serialize;

use crate::domain::{NotificationPayload, UserId};

/// Server-to-client frame, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerFrame {
    /// A notification for the room's owner.
    Notification { data: NotificationPayload },
    /// Acknowledges a `joinRoom` for the bound identity.
    #[serde(rename_all = "camelCase")]
    Joined { user_id: UserId },
    /// A rejected client frame.
    Error { code: String, message: String },
}

impl ServerFrame {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Encode as a text frame body.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn encoded(frame: &ServerFrame) -> Value {
        serde_json::from_str(&frame.encode().expect("encode")).expect("valid json")
    }

    #[rstest]
    fn notification_frame_nests_payload() {
        let frame = ServerFrame::Notification {
            data: NotificationPayload {
                kind: NotificationKind::StatusChange,
                title: "Application Status Changed".to_owned(),
                message: "moved".to_owned(),
            },
        };
        assert_eq!(
            encoded(&frame),
            json!({
                "event": "notification",
                "data": {
                    "type": "status_change",
                    "title": "Application Status Changed",
                    "message": "moved",
                },
            })
        );
    }

    #[rstest]
    fn joined_frame_uses_camel_case() {
        let user_id = UserId::random();
        assert_eq!(
            encoded(&ServerFrame::Joined { user_id }),
            json!({ "event": "joined", "userId": user_id.to_string() })
        );
    }

    #[rstest]
    fn error_frame_carries_code() {
        assert_eq!(
            encoded(&ServerFrame::error("forbidden", "Cannot join another user's room")),
            json!({
                "event": "error",
                "code": "forbidden",
                "message": "Cannot join another user's room",
            })
        );
    }
}
