//! Confirm-then-delete workflow
//!
//! Information Hiding:
//! - Transition rules kept in one place behind `request`/`cancel`/`confirm`
//! - Repository call, notification and redirect sequencing hidden from callers
//! - Single-flight guaranteed by the state itself; no extra flags

use super::navigation::{Navigator, Notification, Notifier, Route};
use super::repository::ConversationRepository;
use crate::core::{ConversationId, DashboardError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionState {
    Idle,
    Confirming(ConversationId),
    Deleting(ConversationId),
    Succeeded(ConversationId),
    /// Transient: reported, then the workflow settles back to `Idle`
    Failed {
        id: ConversationId,
        error: DashboardError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted(ConversationId),
    /// The backend no longer had it; treated as done
    AlreadyDeleted(ConversationId),
    Failed(DashboardError),
    /// Nothing to confirm, or a delete is already running
    Ignored,
}

pub struct DeletionWorkflow {
    repository: Arc<ConversationRepository>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<DeletionState>,
}

impl DeletionWorkflow {
    pub fn new(
        repository: Arc<ConversationRepository>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            navigator,
            notifier,
            state: Mutex::new(DeletionState::Idle),
        }
    }

    pub fn state(&self) -> DeletionState {
        self.lock().clone()
    }

    /// User asked to delete `id`; nothing happens until `confirm`.
    /// Rejected while a delete is running.
    pub fn request(&self, id: ConversationId) -> DeletionState {
        let mut state = self.lock();
        if let DeletionState::Deleting(running) = *state {
            tracing::debug!(
                "[DeletionWorkflow] Ignoring request for {} while {} is being deleted",
                id,
                running
            );
            return state.clone();
        }
        transition(&mut state, DeletionState::Confirming(id));
        state.clone()
    }

    pub fn cancel(&self) -> DeletionState {
        let mut state = self.lock();
        if let DeletionState::Confirming(_) = *state {
            transition(&mut state, DeletionState::Idle);
        }
        state.clone()
    }

    pub async fn confirm(&self) -> DeletionOutcome {
        let id = {
            let mut state = self.lock();
            match *state {
                DeletionState::Confirming(id) => {
                    transition(&mut state, DeletionState::Deleting(id));
                    id
                }
                DeletionState::Deleting(id) => {
                    tracing::debug!("[DeletionWorkflow] Delete of {} already in flight", id);
                    return DeletionOutcome::Ignored;
                }
                _ => return DeletionOutcome::Ignored,
            }
        };

        let abandoned = AbandonGuard::new(&self.state, id);
        let result = self.repository.delete_conversation(id).await;
        abandoned.disarm();

        let mut state = self.lock();
        match result {
            Ok(()) => {
                transition(&mut state, DeletionState::Succeeded(id));
                drop(state);
                self.notifier
                    .notify(Notification::success(format!("Conversation {} deleted", id)));
                self.navigator.redirect(Route::Overview);
                DeletionOutcome::Deleted(id)
            }
            Err(DashboardError::NotFound(_)) => {
                transition(&mut state, DeletionState::Succeeded(id));
                drop(state);
                self.notifier.notify(Notification::info(format!(
                    "Conversation {} was already deleted",
                    id
                )));
                self.navigator.redirect(Route::Overview);
                DeletionOutcome::AlreadyDeleted(id)
            }
            Err(error) => {
                transition(
                    &mut state,
                    DeletionState::Failed {
                        id,
                        error: error.clone(),
                    },
                );
                transition(&mut state, DeletionState::Idle);
                drop(state);
                // The session layer already redirected to login
                if !error.is_unauthenticated() {
                    self.notifier.notify(Notification::error(format!(
                        "Failed to delete conversation {}: {}",
                        id,
                        error.user_message()
                    )));
                }
                DeletionOutcome::Failed(error)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeletionState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<DeletionState>) -> MutexGuard<'_, DeletionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the workflow to `Idle` if `confirm` is dropped while the
/// repository call is still pending.
struct AbandonGuard<'a> {
    state: &'a Mutex<DeletionState>,
    id: ConversationId,
    armed: bool,
}

impl<'a> AbandonGuard<'a> {
    fn new(state: &'a Mutex<DeletionState>, id: ConversationId) -> Self {
        Self {
            state,
            id,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock_state(self.state);
        if *state == DeletionState::Deleting(self.id) {
            tracing::warn!(
                "[DeletionWorkflow] Delete of {} abandoned before it completed",
                self.id
            );
            transition(&mut state, DeletionState::Idle);
        }
    }
}

fn transition(state: &mut DeletionState, next: DeletionState) {
    tracing::debug!("[DeletionWorkflow] {:?} -> {:?}", state, next);
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HttpApiClient;
    use crate::dashboard::navigation::{NotificationLevel, RecordingNavigator, RecordingNotifier};
    use crate::dashboard::session::SessionManager;
    use crate::storage::memory::InMemoryTokenStore;
    use crate::storage::Token;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        workflow: DeletionWorkflow,
        repository: Arc<ConversationRepository>,
        navigator: RecordingNavigator,
        notifier: RecordingNotifier,
    }

    async fn harness(server: &MockServer) -> Harness {
        Mock::given(method("GET"))
            .and(path("/conversations/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 6}, {"id": 7}])))
            .mount(server)
            .await;

        let navigator = RecordingNavigator::new();
        let notifier = RecordingNotifier::new();
        let session = Arc::new(SessionManager::new(
            Arc::new(InMemoryTokenStore::with_token(Token::new("abc"))),
            Arc::new(navigator.clone()),
        ));
        let repository = Arc::new(ConversationRepository::new(
            Arc::new(HttpApiClient::new(server.uri())),
            session,
        ));
        repository.list_conversations().await;

        Harness {
            workflow: DeletionWorkflow::new(
                repository.clone(),
                Arc::new(navigator.clone()),
                Arc::new(notifier.clone()),
            ),
            repository,
            navigator,
            notifier,
        }
    }

    async fn cached_ids(repository: &ConversationRepository) -> Vec<i64> {
        repository
            .cached()
            .await
            .map(|c| c.iter().map(|c| c.id.0).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_request_and_cancel_have_no_side_effects() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let h = harness(&server).await;

        assert_eq!(h.workflow.request(ConversationId(7)), DeletionState::Confirming(ConversationId(7)));
        assert_eq!(h.workflow.cancel(), DeletionState::Idle);
        assert_eq!(h.workflow.confirm().await, DeletionOutcome::Ignored);
        assert!(h.navigator.routes().is_empty());
        assert!(h.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_deletes_notifies_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        let outcome = h.workflow.confirm().await;

        assert_eq!(outcome, DeletionOutcome::Deleted(ConversationId(7)));
        assert_eq!(h.workflow.state(), DeletionState::Succeeded(ConversationId(7)));
        assert_eq!(cached_ids(&h.repository).await, vec![6]);
        assert_eq!(h.navigator.last(), Some(Route::Overview));
        assert_eq!(h.notifier.last().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_failure_returns_to_idle_and_keeps_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        let outcome = h.workflow.confirm().await;

        assert!(matches!(outcome, DeletionOutcome::Failed(DashboardError::TransportFailure(_))));
        assert_eq!(h.workflow.state(), DeletionState::Idle);
        assert_eq!(cached_ids(&h.repository).await, vec![6, 7]);
        assert!(h.navigator.routes().is_empty());
        assert_eq!(h.notifier.last().unwrap().level, NotificationLevel::Error);

        // Retry is possible
        assert_eq!(h.workflow.request(ConversationId(7)), DeletionState::Confirming(ConversationId(7)));
    }

    #[tokio::test]
    async fn test_not_found_counts_as_already_deleted() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        assert_eq!(
            h.workflow.confirm().await,
            DeletionOutcome::AlreadyDeleted(ConversationId(7))
        );
        assert_eq!(h.navigator.last(), Some(Route::Overview));
        assert_eq!(h.notifier.last().unwrap().level, NotificationLevel::Info);
    }

    #[tokio::test]
    async fn test_unauthorized_delete_redirects_to_login_without_error_notice() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        let outcome = h.workflow.confirm().await;

        assert_eq!(outcome, DeletionOutcome::Failed(DashboardError::Unauthenticated));
        assert_eq!(h.workflow.state(), DeletionState::Idle);
        assert_eq!(h.navigator.routes(), vec![Route::Login]);
        assert!(h.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_double_confirm_issues_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .expect(1)
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        let (first, second) = tokio::join!(h.workflow.confirm(), h.workflow.confirm());

        assert_eq!(first, DeletionOutcome::Deleted(ConversationId(7)));
        assert_eq!(second, DeletionOutcome::Ignored);
        assert_eq!(h.navigator.count(&Route::Overview), 1);
    }

    #[tokio::test]
    async fn test_request_rejected_while_deleting() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        let concurrent = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            h.workflow.request(ConversationId(6))
        };
        let (outcome, during) = tokio::join!(h.workflow.confirm(), concurrent);

        assert_eq!(during, DeletionState::Deleting(ConversationId(7)));
        assert_eq!(outcome, DeletionOutcome::Deleted(ConversationId(7)));
    }

    #[tokio::test]
    async fn test_dropped_confirm_returns_to_idle() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/conversations/7"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        let h = harness(&server).await;

        h.workflow.request(ConversationId(7));
        let timed_out = tokio::time::timeout(Duration::from_millis(50), h.workflow.confirm()).await;

        assert!(timed_out.is_err());
        assert_eq!(h.workflow.state(), DeletionState::Idle);
        assert_eq!(h.workflow.request(ConversationId(8)), DeletionState::Confirming(ConversationId(8)));
        // Nothing was reported for the abandoned call
        assert!(h.navigator.routes().is_empty());
        assert!(h.notifier.notifications().is_empty());
    }
}
