use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn as exchanged with the UI and the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Chat-completions wire form.
    pub fn to_message(&self) -> Value {
        json!({
            "role": self.role.as_str(),
            "content": self.content
        })
    }
}

/// Content of the most recent user turn, if any.
pub fn latest_user_message(history: &[ChatMessage]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .map(|message| message.content.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_latest_user_turn() {
        let history = vec![
            ChatMessage::user("beach trip in July"),
            ChatMessage::assistant("Here are some picks"),
            ChatMessage::user("what about the weather?"),
            ChatMessage::assistant("Warm and dry"),
        ];
        assert_eq!(
            latest_user_message(&history),
            Some("what about the weather?")
        );
        assert_eq!(latest_user_message(&[]), None);
    }

    #[test]
    fn roles_round_trip_in_lowercase() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.to_message()["role"], "assistant");
    }
}
