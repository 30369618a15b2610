use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry of the chat widget's conversation, append-only for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }

    /// Role name understood by the generation API.
    pub fn to_api_role(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "model",
        }
    }

    pub fn is_user(self) -> bool {
        self == Speaker::User
    }
}

impl TryFrom<&str> for Speaker {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Speaker::User),
            "assistant" | "model" => Ok(Speaker::Assistant),
            _ => Err(format!("invalid speaker: {value}")),
        }
    }
}

impl TryFrom<String> for Speaker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Speaker> for String {
    fn from(value: Speaker) -> Self {
        value.as_str().to_string()
    }
}

impl ConversationTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }
}
