//! lect-chat: Conversation session manager
//!
//! This crate owns the question/answer session state: the ordered transcript,
//! the single-flight request guard, and the async controller that drives
//! requests against the external answering service.

pub mod controller;
pub mod error;
pub mod ids;
pub mod service;
pub mod session;
pub mod types;

pub use controller::{ChatController, ChatEvent};
pub use error::{Error, Result};
pub use ids::{SessionIdSource, UuidIdSource};
pub use service::{AnswerService, HttpAnswerService};
pub use session::ChatSession;
pub use types::{AskRequest, AskResponse, CourseStatus, Message, Role};
