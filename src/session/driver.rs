//! Async driver for a [`MatchSession`]
//!
//! Owns the session, feeds it events from a channel, and keeps a single timer
//! armed for the pending replay continuation. Dropping the driver future
//! drops the timer with it.

use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::time::{sleep, Sleep};

use crate::replay::engine::Continuation;
use crate::session::gateway::ProtocolGateway;
use crate::session::hooks::PresentationHooks;
use crate::session::match_session::{MatchSession, SessionEvent};

struct ArmedTimer {
    token: u64,
    sleep: Pin<Box<Sleep>>,
}

impl ArmedTimer {
    fn new(continuation: Continuation) -> Self {
        Self {
            token: continuation.token,
            sleep: Box::pin(sleep(continuation.delay)),
        }
    }
}

enum Wake {
    Event(Option<SessionEvent>),
    Timer(u64),
}

async fn fire(timer: &mut Option<ArmedTimer>) -> u64 {
    match timer {
        Some(armed) => {
            armed.sleep.as_mut().await;
            armed.token
        }
        None => std::future::pending().await,
    }
}

/// Run until the event channel closes and any running replay has finished.
/// Returns the session for inspection.
pub async fn run_session<G, H>(
    mut session: MatchSession<G, H>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) -> MatchSession<G, H>
where
    G: ProtocolGateway,
    H: PresentationHooks,
{
    let mut timer: Option<ArmedTimer> = None;
    let mut inbound_open = true;

    loop {
        if !inbound_open && timer.is_none() {
            break;
        }

        let wake = tokio::select! {
            event = events.recv(), if inbound_open => Wake::Event(event),
            token = fire(&mut timer) => Wake::Timer(token),
        };

        let continuation = match wake {
            Wake::Event(Some(event)) => session.handle(event),
            Wake::Event(None) => {
                tracing::debug!("event channel closed");
                inbound_open = false;
                continue;
            }
            Wake::Timer(token) => {
                timer = None;
                session.on_continuation(token)
            }
        };

        if let Some(continuation) = continuation {
            timer = Some(ArmedTimer::new(continuation));
        }
    }

    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ClientConfig;
    use crate::core::types::{GameId, PlayerId};
    use crate::session::gateway::RecordingGateway;
    use crate::session::hooks::RecordingHooks;

    #[tokio::test]
    async fn test_returns_when_channel_closes() {
        let session = MatchSession::new(
            ClientConfig::default(),
            PlayerId::new("p"),
            GameId::new("g"),
            RecordingGateway::new(),
            RecordingHooks::new(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(SessionEvent::InboundText(
            r#"{"action":"error","message":"nope"}"#.to_string(),
        ))
        .unwrap();
        drop(tx);
        let session = run_session(session, rx).await;
        assert_eq!(session.hooks().events.len(), 1);
    }
}
