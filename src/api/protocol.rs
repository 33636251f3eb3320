use crate::game::{Color, PALETTE};
use crate::session::Command;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client → Server message types
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Start,
    Color { color: Color },
    Pause,
    Resume,
    Quit,
    Menu,
}

impl From<ClientMessage> for Command {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Start => Command::Start,
            ClientMessage::Color { color } => Command::Submit(color),
            ClientMessage::Pause => Command::Pause,
            ClientMessage::Resume => Command::Resume,
            ClientMessage::Quit => Command::Quit,
            ClientMessage::Menu => Command::Menu,
        }
    }
}

/// Client message that could not be understood
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    Malformed(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(reason) => write!(f, "malformed message: {}", reason),
        }
    }
}

impl std::error::Error for ProtocolError {}

pub fn parse_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Server → Client: first message on a new connection
#[derive(Debug, Clone, Serialize)]
pub struct SessionMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub session_id: Uuid,
    pub palette: [Color; 4],
}

impl SessionMessage {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            msg_type: "session".to_string(),
            session_id,
            palette: PALETTE,
        }
    }
}

/// Server → Client: Error message
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: String) -> Self {
        Self {
            msg_type: "error".to_string(),
            error,
        }
    }
}
