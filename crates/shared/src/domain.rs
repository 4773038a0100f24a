use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "Teneo Web Chat";

pub const AUTHOR_USER: &str = "user";
pub const AUTHOR_BOT: &str = "bot";
pub const MESSAGE_TYPE_TEXT: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Minimized,
    Maximized,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Minimized => "minimized",
            Visibility::Maximized => "maximized",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minimized" => Some(Visibility::Minimized),
            "maximized" => Some(Visibility::Maximized),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `get_state` exposes to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the chat history, `{author, type, data: {text, ...}}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: MessageData,
}

impl ChatMessage {
    pub fn text(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            kind: MESSAGE_TYPE_TEXT.to_string(),
            data: MessageData {
                text: text.into(),
                extra: Map::new(),
            },
        }
    }

    pub fn from_user(text: impl Into<String>) -> Self {
        Self::text(AUTHOR_USER, text)
    }

    pub fn from_bot(text: impl Into<String>) -> Self {
        Self::text(AUTHOR_BOT, text)
    }
}

/// Payload of `send_input`: the user text plus per-request engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub text: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl InputMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Map::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
