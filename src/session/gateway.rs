//! Outbound message sinks

use tokio::sync::mpsc;

use crate::session::messages::OutboundMessage;

/// Fire-and-forget delivery to the server
pub trait ProtocolGateway {
    fn send(&mut self, message: OutboundMessage);
}

/// Serializes each message to JSON and pushes it onto a channel, typically
/// drained by a websocket writer task
#[derive(Debug, Clone)]
pub struct ChannelGateway {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelGateway {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Gateway plus the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl ProtocolGateway for ChannelGateway {
    fn send(&mut self, message: OutboundMessage) {
        let frame = match message.to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode outbound message");
                return;
            }
        };
        if self.tx.send(frame).is_err() {
            tracing::warn!("outbound channel closed; message dropped");
        }
    }
}

/// Keeps every message in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingGateway {
    pub sent: Vec<OutboundMessage>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&OutboundMessage> {
        self.sent.last()
    }
}

impl ProtocolGateway for RecordingGateway {
    fn send(&mut self, message: OutboundMessage) {
        self.sent.push(message);
    }
}
