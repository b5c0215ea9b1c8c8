//! Conversation session state: transcript, session id, and single-flight guard.
//!
//! This is the pure state machine: `Idle --begin_turn--> Awaiting
//! --resolve--> Idle`. The async request itself is driven by
//! [`crate::controller::ChatController`].

use crate::{
    error::Error,
    ids::SessionIdSource,
    types::{AskRequest, AskResponse, Message},
};

/// Shown when the service replies successfully but without an answer field.
const FALLBACK_ANSWER: &str = "No answer was received.";

/// Prefix of the synthesized assistant messages appended on request failure.
const FAILURE_PREFIX: &str = "Something went wrong:";

/// Whether a transcript message is a synthesized failure notice from
/// [`ChatSession::resolve_error`] (for error styling in the UI).
pub fn is_failure_notice(message: &Message) -> bool {
    message.role == crate::types::Role::Assistant && message.content.starts_with(FAILURE_PREFIX)
}

/// One conversational session: a stable id, an ordered transcript, and a
/// single-flight request guard.
pub struct ChatSession {
    id: String,
    course_id: String,
    transcript: Vec<Message>,
    pending: bool,
}

impl ChatSession {
    /// Create a session for a course. The transcript is seeded with one
    /// assistant greeting; the id is minted once and never changes.
    pub fn new(ids: &dyn SessionIdSource, course_id: impl Into<String>) -> Self {
        let course_id = course_id.into();
        let greeting = Message::assistant(format!(
            "Chat for course {} is ready. Ask a question to get started.",
            course_id
        ));
        Self {
            id: ids.next_id(),
            course_id,
            transcript: vec![greeting],
            pending: false,
        }
    }

    /// The session id, used as `conversation_id` on every request
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The course this session is grounded in
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// The ordered transcript (render order = causal order)
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Whether a request is currently in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start a turn. Appends the user message optimistically, raises the
    /// single-flight guard, and returns the request to issue.
    ///
    /// Returns `None` (and mutates nothing) when the text is blank after
    /// trimming or a request is already in flight.
    pub fn begin_turn(&mut self, text: &str) -> Option<AskRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.pending {
            return None;
        }

        self.transcript.push(Message::user(trimmed));
        self.pending = true;

        Some(AskRequest {
            course_id: self.course_id.clone(),
            question: trimmed.to_string(),
            conversation_id: self.id.clone(),
        })
    }

    /// Apply a successful service response: appends the assistant answer
    /// (falling back when the answer field is missing or empty) and releases
    /// the single-flight guard.
    pub fn resolve_answer(&mut self, response: AskResponse) {
        let answer = match response.answer {
            Some(text) if !text.is_empty() => text,
            _ => {
                tracing::warn!("service response carried no answer, using fallback");
                FALLBACK_ANSWER.to_string()
            }
        };
        self.transcript.push(Message::assistant(answer));
        self.pending = false;
    }

    /// Apply a failed request: appends a synthesized assistant message
    /// describing the failure and releases the single-flight guard. The
    /// user's already-appended message stays in place.
    pub fn resolve_error(&mut self, error: &Error) {
        self.transcript.push(Message::assistant(format!(
            "{} {}. Check that the answering service is running.",
            FAILURE_PREFIX, error
        )));
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::testing::FixedIdSource;
    use crate::ids::UuidIdSource;
    use crate::types::Role;

    fn session() -> ChatSession {
        ChatSession::new(&FixedIdSource::new(&["session-1"]), "course-42")
    }

    fn answer(text: &str) -> AskResponse {
        AskResponse {
            answer: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_seeds_greeting() {
        let s = session();
        assert_eq!(s.id(), "session-1");
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.transcript()[0].role, Role::Assistant);
        assert!(s.transcript()[0].content.contains("course-42"));
        assert!(!s.is_pending());
    }

    #[test]
    fn test_begin_turn_appends_user_and_raises_guard() {
        let mut s = session();
        let req = s.begin_turn("  What is X?  ").expect("turn should start");
        assert_eq!(req.question, "What is X?");
        assert_eq!(req.course_id, "course-42");
        assert_eq!(req.conversation_id, "session-1");
        assert!(s.is_pending());
        assert_eq!(s.transcript().last().unwrap().role, Role::User);
        assert_eq!(s.transcript().last().unwrap().content, "What is X?");
    }

    #[test]
    fn test_blank_input_is_a_no_op() {
        let mut s = session();
        assert!(s.begin_turn("").is_none());
        assert!(s.begin_turn("   \t\n").is_none());
        assert_eq!(s.transcript().len(), 1);
        assert!(!s.is_pending());
    }

    #[test]
    fn test_second_turn_rejected_while_pending() {
        let mut s = session();
        assert!(s.begin_turn("first").is_some());
        assert!(s.begin_turn("second").is_none());
        // Only greeting + first user message
        assert_eq!(s.transcript().len(), 2);
    }

    #[test]
    fn test_resolve_answer_appends_and_releases_guard() {
        let mut s = session();
        s.begin_turn("What is X?").unwrap();
        s.resolve_answer(answer("X is Y"));
        assert!(!s.is_pending());
        let roles: Vec<Role> = s.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(s.transcript().last().unwrap().content, "X is Y");
    }

    #[test]
    fn test_missing_answer_degrades_to_fallback() {
        let mut s = session();
        s.begin_turn("hello").unwrap();
        s.resolve_answer(AskResponse::default());
        assert_eq!(s.transcript().last().unwrap().content, FALLBACK_ANSWER);
        assert!(!s.is_pending());
    }

    #[test]
    fn test_empty_answer_degrades_to_fallback() {
        let mut s = session();
        s.begin_turn("hello").unwrap();
        s.resolve_answer(answer(""));
        assert_eq!(s.transcript().last().unwrap().content, FALLBACK_ANSWER);
    }

    #[test]
    fn test_resolve_error_keeps_user_message_and_releases_guard() {
        let mut s = session();
        s.begin_turn("hello").unwrap();
        s.resolve_error(&Error::api(503, "unavailable"));
        assert!(!s.is_pending());
        assert_eq!(s.transcript()[1].content, "hello");
        let last = s.transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.contains("503"));
        assert!(last.content.contains("answering service"));
    }

    #[test]
    fn test_session_usable_after_failure() {
        let mut s = session();
        s.begin_turn("one").unwrap();
        s.resolve_error(&Error::api(500, "boom"));
        let req = s.begin_turn("two").expect("guard must be released");
        assert_eq!(req.question, "two");
    }

    #[test]
    fn test_conversation_id_constant_across_turns() {
        let mut s = session();
        let first = s.begin_turn("one").unwrap();
        s.resolve_answer(answer("a"));
        let second = s.begin_turn("two").unwrap();
        assert_eq!(first.conversation_id, second.conversation_id);
    }

    #[test]
    fn test_independent_sessions_get_distinct_ids() {
        let ids = UuidIdSource;
        let a = ChatSession::new(&ids, "c");
        let b = ChatSession::new(&ids, "c");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_failure_notice_detection() {
        let mut s = session();
        s.begin_turn("hello").unwrap();
        s.resolve_error(&Error::api(500, "boom"));
        assert!(is_failure_notice(s.transcript().last().unwrap()));
        assert!(!is_failure_notice(&s.transcript()[0]));
        assert!(!is_failure_notice(&s.transcript()[1]));
    }

    #[test]
    fn test_turn_ordering_over_many_turns() {
        let mut s = session();
        for i in 0..5 {
            s.begin_turn(&format!("q{}", i)).unwrap();
            s.resolve_answer(answer(&format!("a{}", i)));
        }
        // greeting + 5 * (user, assistant)
        assert_eq!(s.transcript().len(), 11);
        for i in 0..5 {
            assert_eq!(s.transcript()[1 + 2 * i].role, Role::User);
            assert_eq!(s.transcript()[2 + 2 * i].role, Role::Assistant);
        }
    }
}
