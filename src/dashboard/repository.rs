//! Conversation Repository - the only owner of the conversation cache
//!
//! Information Hiding:
//! - Token gating delegated to `SessionManager`
//! - Transport failures translated into `DashboardError` here and nowhere else
//! - Cache published as immutable snapshots; readers never see a mutation

use super::session::SessionManager;
use crate::core::{ApiFailure, Collection, Conversation, ConversationApi, ConversationId, DashboardError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// What a consumer should display for the collection right now
#[derive(Debug, Clone)]
pub enum CacheState {
    NotLoaded,
    Loading,
    Loaded(Collection),
}

impl CacheState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CacheState::Loading)
    }

    pub fn collection(&self) -> Option<&Collection> {
        match self {
            CacheState::Loaded(collection) => Some(collection),
            _ => None,
        }
    }
}

/// Result of a list call. On failure `conversations` is empty and `error`
/// says why; the cache keeps its previous contents.
#[derive(Debug, Clone)]
pub struct Listing {
    pub conversations: Collection,
    pub error: Option<DashboardError>,
}

impl Listing {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(error: DashboardError) -> Self {
        Self {
            conversations: Vec::new().into(),
            error: Some(error),
        }
    }
}

pub struct ConversationRepository {
    api: Arc<dyn ConversationApi>,
    session: Arc<SessionManager>,
    cache: RwLock<Option<Collection>>,
    lists_in_flight: AtomicUsize,
}

impl ConversationRepository {
    pub fn new(api: Arc<dyn ConversationApi>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            cache: RwLock::new(None),
            lists_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Most recently committed collection, or `Loading` while a list call
    /// is outstanding. Detail fetches do not count.
    pub async fn snapshot(&self) -> CacheState {
        if self.lists_in_flight.load(Ordering::SeqCst) > 0 {
            return CacheState::Loading;
        }
        match self.cache.read().await.as_ref() {
            Some(collection) => CacheState::Loaded(collection.clone()),
            None => CacheState::NotLoaded,
        }
    }

    /// Committed collection ignoring any in-flight refresh
    pub async fn cached(&self) -> Option<Collection> {
        self.cache.read().await.clone()
    }

    pub async fn list_conversations(&self) -> Listing {
        let token = match self.session.require_token_or_redirect().await {
            Ok(token) => token,
            Err(e) => return Listing::failed(e),
        };

        let _loading = InFlight::enter(&self.lists_in_flight);
        match self.api.list_conversations(&token).await {
            Ok(conversations) => {
                let collection: Collection = conversations.into();
                *self.cache.write().await = Some(collection.clone());
                tracing::info!(
                    "[ConversationRepository] Loaded {} conversations",
                    collection.len()
                );
                Listing {
                    conversations: collection,
                    error: None,
                }
            }
            Err(failure) => {
                let error = self.translate(failure, "Conversations").await;
                tracing::error!("[ConversationRepository] Failed to fetch conversations: {}", error);
                Listing::failed(error)
            }
        }
    }

    pub async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, DashboardError> {
        let token = self.session.require_token_or_redirect().await?;

        match self.api.get_conversation(&token, id).await {
            Ok(conversation) => Ok(conversation),
            Err(failure) => {
                let error = self.translate(failure, &format!("Conversation {}", id)).await;
                tracing::error!("[ConversationRepository] Failed to fetch conversation {}: {}", id, error);
                Err(error)
            }
        }
    }

    /// Removes the entry from the cache only after the backend confirmed it.
    /// A second delete of the same id fails with `NotFound`.
    pub async fn delete_conversation(&self, id: ConversationId) -> Result<(), DashboardError> {
        let token = self.session.require_token_or_redirect().await?;

        if let Err(failure) = self.api.delete_conversation(&token, id).await {
            let error = self.translate(failure, &format!("Conversation {}", id)).await;
            tracing::error!("[ConversationRepository] Failed to delete conversation {}: {}", id, error);
            return Err(error);
        }

        let mut cache = self.cache.write().await;
        if let Some(collection) = cache.as_ref() {
            if collection.iter().any(|c| c.id == id) {
                let remaining: Collection = collection.iter().filter(|c| c.id != id).cloned().collect();
                *cache = Some(remaining);
            }
        }
        tracing::info!("[ConversationRepository] Deleted conversation {}", id);
        Ok(())
    }

    /// Maps a transport failure and runs the 401 path when needed
    async fn translate(&self, failure: ApiFailure, what: &str) -> DashboardError {
        if failure.is_unauthorized() {
            self.session.handle_unauthorized().await;
        }
        failure.into_dashboard_error(what)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
