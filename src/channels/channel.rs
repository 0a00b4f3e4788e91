//! The Channel trait and the message types that cross it.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// A stream of inbound messages from a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// One inbound text message.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Channel name ("telegram", "cli").
    pub channel: String,
    /// Opaque per-user identifier supplied by the transport.
    pub user_id: String,
    /// Display name, if the transport knows one.
    pub user_name: Option<String>,
    pub content: String,
    /// Channel-specific routing data (e.g. Telegram chat_id).
    pub metadata: serde_json::Value,
}

impl IncomingMessage {
    pub fn new(channel: &str, user_id: &str, content: impl Into<String>) -> Self {
        Self {
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            user_name: None,
            content: content.into(),
            metadata: serde_json::json!({}),
        }
    }

    pub fn with_user_name(mut self, name: &str) -> Self {
        self.user_name = Some(name.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// The legal-input vocabulary to offer alongside a text reply.
///
/// Channels that can render buttons (Telegram) turn this into a reply
/// keyboard; others may print it as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Add entry / stats / export / help.
    Main,
    /// The ten catalogue labels plus back.
    Emotions,
    /// 0, 10, …, 100 plus back.
    Intensity,
    /// Skip plus back.
    Skip,
}

/// One outbound reply.
#[derive(Debug, Clone)]
pub enum OutgoingResponse {
    Text {
        text: String,
        keyboard: Keyboard,
    },
    /// A file attachment (CSV export). Bytes only — nothing touches disk.
    Document {
        file_name: String,
        bytes: Vec<u8>,
        caption: String,
    },
}

impl OutgoingResponse {
    pub fn text(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::Text {
            text: text.into(),
            keyboard,
        }
    }

    pub fn document(file_name: impl Into<String>, bytes: Vec<u8>, caption: &str) -> Self {
        Self::Document {
            file_name: file_name.into(),
            bytes,
            caption: caption.to_string(),
        }
    }
}

/// A message transport.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging and routing.
    fn name(&self) -> &str;

    /// Start listening; yields inbound messages until shutdown.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Deliver a reply to the sender of `msg`.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Verify the channel can reach its backing service.
    async fn health_check(&self) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError>;
}
