//! Per-connection WebSocket handler.
//!
//! Each connection is bound to the identity authenticated at upgrade and
//! forwards frames pushed into that user's room. The public contract pings
//! every 5s and considers a connection idle after 10s without client
//! traffic. Tests shorten both intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::UserId;
use crate::inbound::ws::messages::ClientFrame;
use crate::outbound::realtime::{RoomMembership, ServerFrame};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(400);

pub(super) async fn handle_ws_session(
    membership: RoomMembership,
    outbox: UnboundedReceiver<String>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(membership, outbox).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    RoomClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    membership: RoomMembership,
    outbox: UnboundedReceiver<String>,
}

impl WsSession {
    fn new(membership: RoomMembership, outbox: UnboundedReceiver<String>) -> Self {
        Self { membership, outbox }
    }

    fn user(&self) -> UserId {
        self.membership.user()
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                frame = self.outbox.recv() => {
                    Self::forward_room_frame(&mut session, frame).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = close_action_for(&error);
                close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn forward_room_frame(
        session: &mut Session,
        frame: Option<String>,
    ) -> Result<(), SessionError> {
        let Some(frame) = frame else {
            return Err(SessionError::RoomClosed);
        };
        session.text(frame).await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let frame = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(error = %error, user_id = %self.user(), "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        let reply = match frame {
            ClientFrame::JoinRoom { user_id } => self.join_room(&user_id),
        };
        send_json(session, &reply)
            .await
            .map_err(SessionError::Network)
    }

    fn join_room(&self, requested: &str) -> ServerFrame {
        let user_id = self.user();
        if UserId::parse(requested).is_ok_and(|requested| requested == user_id) {
            debug!(user_id = %user_id, "client joined its room");
            ServerFrame::Joined { user_id }
        } else {
            warn!(user_id = %user_id, requested, "rejected joinRoom for another user");
            ServerFrame::error("forbidden", "Cannot join another user's room")
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        let user_id = self.user();
        match error {
            SessionError::HeartbeatTimeout => {
                warn!(user_id = %user_id, "WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(user_id = %user_id, error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(user_id = %user_id, error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::RoomClosed => {
                warn!(user_id = %user_id, "room sender dropped; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }
}

async fn send_json(session: &mut Session, frame: &ServerFrame) -> Result<(), Closed> {
    match frame.encode() {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "Failed to serialize WebSocket payload");
            Ok(())
        }
    }
}

fn close_action_for(error: &SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::RoomClosed => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Away,
            description: Some("room closed".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Policy,
            description: Some("invalid payload".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close WebSocket session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
