//! Core types for chat sessions and the answering-service wire format

use serde::{Deserialize, Serialize};

/// Who authored a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Get a human-readable name for this role
    pub fn name(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single transcript message. Immutable once appended; transcript order is
/// append-only and significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /api/chat/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub course_id: String,
    pub question: String,
    pub conversation_id: String,
}

/// Response body from `POST /api/chat/ask`.
///
/// Every field is tolerated missing; a body without `answer` degrades to a
/// fallback message rather than failing the turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AskResponse {
    pub answer: Option<String>,
    pub sources: Vec<String>,
    pub conversation_id: Option<String>,
    pub course_id: Option<String>,
}

/// Response body from `GET /status/{course_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseStatus {
    pub course_id: String,
    pub status: String,
    pub progress: u32,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_ask_response_tolerates_missing_fields() {
        let resp: AskResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.answer.is_none());
        assert!(resp.sources.is_empty());
    }

    #[test]
    fn test_ask_request_wire_shape() {
        let req = AskRequest {
            course_id: "course-1".into(),
            question: "What is X?".into(),
            conversation_id: "abc".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["course_id"], "course-1");
        assert_eq!(value["question"], "What is X?");
        assert_eq!(value["conversation_id"], "abc");
    }
}
