//! Per-connection complaint feed.
//!
//! Pushes the student's complaint snapshot on connect and after every change
//! notification from the complaints collection. The server pings every 5s and
//! drops connections idle for 10s; tests shorten both. A provider-side
//! sign-out closes the feed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::{IdentityState, UserId};
use crate::domain::ports::{CollectionChange, ComplaintQuery};
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};

#[cfg(not(test))]
pub(super) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
pub(super) const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
pub(super) const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
pub(super) const CLIENT_TIMEOUT: Duration = Duration::from_millis(400);

pub(super) async fn handle_ws_session(
    complaints: Arc<dyn ComplaintQuery>,
    owner: UserId,
    identity: watch::Receiver<IdentityState>,
    session: Session,
    stream: MessageStream,
) {
    ComplaintFeed::new(complaints, owner)
        .run(identity, session, stream)
        .await;
}

/// Resolve when the followed identity is signed out. A signal whose
/// publisher is gone never resolves.
async fn signed_out(identity: &mut watch::Receiver<IdentityState>) {
    if identity
        .wait_for(|state| *state == IdentityState::SignedOut)
        .await
        .is_err()
    {
        std::future::pending::<()>().await;
    }
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    FeedClosed,
    SignedOut,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

struct ComplaintFeed {
    complaints: Arc<dyn ComplaintQuery>,
    owner: UserId,
    last_sent: Option<String>,
}

impl ComplaintFeed {
    fn new(complaints: Arc<dyn ComplaintQuery>, owner: UserId) -> Self {
        Self {
            complaints,
            owner,
            last_sent: None,
        }
    }

    async fn run(
        mut self,
        mut identity: watch::Receiver<IdentityState>,
        mut session: Session,
        mut stream: MessageStream,
    ) {
        // Subscribe before the first read so no write slips between them.
        let mut changes = self.complaints.changes();
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let mut result = self.push_snapshot(&mut session).await;
        while result.is_ok() {
            result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, last_heartbeat).await
                }
                change = changes.recv() => self.handle_change(&mut session, change).await,
                () = signed_out(&mut identity) => Err(SessionError::SignedOut),
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
            };
        }
        if let Err(error) = result {
            self.log_shutdown_reason(&error);
            if let CloseAction::Close(reason) = close_action_for(error) {
                if let Err(error) = session.close(reason).await {
                    warn!(%error, "failed to close complaint feed");
                }
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: Instant,
    ) -> Result<(), SessionError> {
        if last_heartbeat.elapsed() > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_change(
        &mut self,
        session: &mut Session,
        change: Result<CollectionChange, RecvError>,
    ) -> Result<(), SessionError> {
        match change {
            Ok(change) => {
                debug!(complaint_id = %change.id, revision = change.revision, "complaints changed");
                self.push_snapshot(session).await
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "complaint feed lagged; resending snapshot");
                self.push_snapshot(session).await
            }
            Err(RecvError::Closed) => Err(SessionError::FeedClosed),
        }
    }

    async fn handle_stream_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let message = match message {
            Some(Ok(message)) => message,
            Some(Err(error)) => return Err(SessionError::Protocol(error)),
            None => return Err(SessionError::StreamClosed),
        };
        *last_heartbeat = Instant::now();
        match message {
            Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Refresh) => {
                    self.last_sent = None;
                    self.push_snapshot(session).await
                }
                Err(error) => {
                    warn!(%error, "rejected malformed complaint feed frame");
                    Err(SessionError::InvalidPayload)
                }
            },
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    /// Read the owner's complaints and send them unless identical to the
    /// previous frame. Read failures are reported to the client in-band.
    async fn push_snapshot(&mut self, session: &mut Session) -> Result<(), SessionError> {
        let message = match self.complaints.list_mine(&self.owner).await {
            Ok(listing) => ServerMessage::from(listing),
            Err(error) => {
                warn!(user_id = %self.owner, %error, "complaint snapshot failed");
                ServerMessage::from(&error)
            }
        };
        let body = match serde_json::to_string(&message) {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, "failed to serialise complaint snapshot");
                return Ok(());
            }
        };
        if self.last_sent.as_deref() == Some(body.as_str()) {
            return Ok(());
        }
        session
            .text(body.clone())
            .await
            .map_err(SessionError::Network)?;
        self.last_sent = Some(body);
        Ok(())
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                debug!(user_id = %self.owner, "complaint feed heartbeat timeout");
            }
            SessionError::Protocol(error) => warn!(%error, "complaint feed protocol error"),
            SessionError::Network(error) => warn!(%error, "complaint feed send failed"),
            SessionError::FeedClosed => warn!("complaint change notifications ended"),
            SessionError::SignedOut => info!(user_id = %self.owner, "complaint feed signed out"),
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }
}

fn close_action_for(error: SessionError) -> CloseAction {
    let close = |code, description: &str| {
        CloseAction::Close(Some(CloseReason {
            code,
            description: Some(description.to_owned()),
        }))
    };
    match error {
        SessionError::HeartbeatTimeout => close(CloseCode::Normal, "heartbeat timeout"),
        SessionError::Protocol(_) => close(CloseCode::Protocol, "protocol error"),
        SessionError::InvalidPayload => close(CloseCode::Policy, "invalid payload"),
        SessionError::FeedClosed => close(CloseCode::Away, "feed closed"),
        SessionError::SignedOut => close(CloseCode::Normal, "signed out"),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
