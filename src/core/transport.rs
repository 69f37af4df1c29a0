//! # Transport
//!
//! The send collaborator. The dispatcher hands every dequeued message to a
//! `Transport` exactly once; what happens after that (network, retries,
//! logging) is the transport's business.

use std::fmt;

use async_trait::async_trait;
use log::debug;

use crate::core::content::SharedContent;

/// A line the user submitted, bound to the conversation it was typed into.
#[derive(Clone)]
pub struct OutgoingMessage {
    pub text: String,
    /// Content of the pane that was active when the line was submitted.
    pub conversation: SharedContent,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>, conversation: SharedContent) -> Self {
        Self {
            text: text.into(),
            conversation,
        }
    }
}

impl fmt::Debug for OutgoingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutgoingMessage")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum TransportError {
    /// Not connected to anything that could take the message.
    Disconnected,
    /// The remote side refused the message.
    Rejected(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Disconnected => write!(f, "transport disconnected"),
            TransportError::Rejected(msg) => write!(f, "message rejected: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, message: &OutgoingMessage) -> Result<(), TransportError>;
}

/// Loopback transport: writes `nick: text` back into the conversation.
pub struct EchoTransport {
    nickname: String,
}

impl EchoTransport {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
        }
    }
}

#[async_trait]
impl Transport for EchoTransport {
    fn name(&self) -> &str {
        "echo"
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<(), TransportError> {
        debug!("echo transport: {} bytes from {}", message.text.len(), self.nickname);
        message
            .conversation
            .append(format!("{}: {}", self.nickname, message.text));
        Ok(())
    }
}
