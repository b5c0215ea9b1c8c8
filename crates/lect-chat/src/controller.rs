//! Async driver for a chat session.
//!
//! [`ChatController`] wraps the pure [`ChatSession`] state machine: `submit`
//! spawns the outbound request and the resolution comes back as a
//! [`ChatEvent`] on the receiver handed out at construction. The owning event
//! loop forwards each event into [`ChatController::apply`], which keeps every
//! state transition on the owner's single execution context.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{error::Result, service::AnswerService, session::ChatSession, types::AskResponse};

/// Events emitted by in-flight chat requests
#[derive(Debug)]
pub enum ChatEvent {
    /// An outbound request resolved (successfully or not)
    TurnResolved {
        /// Controller epoch at the time the request was issued. Stale epochs
        /// are discarded in [`ChatController::apply`].
        epoch: u64,
        outcome: Result<AskResponse>,
    },
}

/// Drives requests for one [`ChatSession`] against an [`AnswerService`]
pub struct ChatController {
    session: ChatSession,
    service: Arc<dyn AnswerService>,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
    cancel: CancellationToken,
    epoch: u64,
}

impl ChatController {
    /// Create a controller and the event receiver for the owner's select loop
    pub fn new(
        session: ChatSession,
        service: Arc<dyn AnswerService>,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                session,
                service,
                event_tx,
                cancel: CancellationToken::new(),
                epoch: 0,
            },
            event_rx,
        )
    }

    /// The session state (for rendering)
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Submit a question. Returns `true` if a request was issued; `false` on
    /// blank input, when a request is already in flight, or after `close`.
    pub fn submit(&mut self, text: &str) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        let Some(request) = self.session.begin_turn(text) else {
            return false;
        };

        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = service.ask(&request) => outcome,
            };
            // The receiver may already be gone during shutdown.
            let _ = event_tx.send(ChatEvent::TurnResolved { epoch, outcome });
        });

        true
    }

    /// Apply a resolution event. Events issued before [`close`](Self::close)
    /// carry an older epoch and are discarded rather than applied to a
    /// torn-down session.
    pub fn apply(&mut self, event: ChatEvent) {
        let ChatEvent::TurnResolved { epoch, outcome } = event;
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale resolution");
            return;
        }
        match outcome {
            Ok(response) => self.session.resolve_answer(response),
            Err(error) => {
                tracing::debug!(%error, "request failed");
                self.session.resolve_error(&error);
            }
        }
    }

    /// Tear the controller down: cancels any in-flight request and ensures
    /// late resolutions are discarded by `apply`.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ids::testing::FixedIdSource;
    use crate::types::Role;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct InstantService {
        outcome: fn() -> Result<AskResponse>,
    }

    #[async_trait]
    impl AnswerService for InstantService {
        async fn ask(&self, _request: &crate::types::AskRequest) -> Result<AskResponse> {
            (self.outcome)()
        }
    }

    /// Holds requests in flight until the test releases the gate
    struct GatedService {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl AnswerService for GatedService {
        async fn ask(&self, _request: &crate::types::AskRequest) -> Result<AskResponse> {
            self.gate.notified().await;
            Ok(AskResponse {
                answer: Some("X is Y".into()),
                ..Default::default()
            })
        }
    }

    fn new_session() -> ChatSession {
        ChatSession::new(&FixedIdSource::new(&["session-1"]), "course-42")
    }

    #[tokio::test]
    async fn test_successful_turn_end_to_end() {
        let service = Arc::new(InstantService {
            outcome: || {
                Ok(AskResponse {
                    answer: Some("X is Y".into()),
                    ..Default::default()
                })
            },
        });
        let (mut controller, mut events) = ChatController::new(new_session(), service);

        assert!(controller.submit("What is X?"));
        let event = events.recv().await.expect("resolution event");
        controller.apply(event);

        let transcript = controller.session().transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].content, "What is X?");
        assert_eq!(transcript[2].content, "X is Y");
        assert!(!controller.session().is_pending());
    }

    #[tokio::test]
    async fn test_failed_turn_surfaces_error_in_transcript() {
        let service = Arc::new(InstantService {
            outcome: || Err(Error::api(503, "unavailable")),
        });
        let (mut controller, mut events) = ChatController::new(new_session(), service);

        controller.submit("What is X?");
        let event = events.recv().await.unwrap();
        controller.apply(event);

        let last = controller.session().transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.contains("503"));
        assert!(!controller.session().is_pending());
    }

    #[tokio::test]
    async fn test_pending_true_exactly_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(GatedService {
            gate: Arc::clone(&gate),
        });
        let (mut controller, mut events) = ChatController::new(new_session(), service);

        assert!(!controller.session().is_pending());
        assert!(controller.submit("What is X?"));
        assert!(controller.session().is_pending());

        // Single-flight: a second submit while in flight is a no-op.
        assert!(!controller.submit("another question"));
        assert_eq!(controller.session().transcript().len(), 2);

        gate.notify_one();
        let event = events.recv().await.unwrap();
        controller.apply(event);
        assert!(!controller.session().is_pending());
    }

    #[tokio::test]
    async fn test_stale_resolution_discarded_after_close() {
        let service = Arc::new(InstantService {
            outcome: || {
                Ok(AskResponse {
                    answer: Some("too late".into()),
                    ..Default::default()
                })
            },
        });
        let (mut controller, mut events) = ChatController::new(new_session(), service);

        controller.submit("What is X?");
        let event = events.recv().await.unwrap();

        controller.close();
        controller.apply(event);

        // No assistant reply was applied to the torn-down session.
        let transcript = controller.session().transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_closed_controller_rejects_submit() {
        let service = Arc::new(InstantService {
            outcome: || Ok(AskResponse::default()),
        });
        let (mut controller, _events) = ChatController::new(new_session(), service);
        controller.close();
        assert!(!controller.submit("What is X?"));
        assert_eq!(controller.session().transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_submit_spawns_nothing() {
        let service = Arc::new(InstantService {
            outcome: || Ok(AskResponse::default()),
        });
        let (mut controller, mut events) = ChatController::new(new_session(), service);

        assert!(!controller.submit("   "));
        assert!(events.try_recv().is_err());
        assert_eq!(controller.session().transcript().len(), 1);
    }
}
