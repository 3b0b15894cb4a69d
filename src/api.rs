//! Dashboard facade
//!
//! This module wires the session, repository, auth and deletion
//! components together from `Settings`, so callers deal with one handle.

use crate::config::Settings;
use crate::core::{ConversationApi, HttpApiClient};
use crate::dashboard::{
    AuthFlow, ConversationRepository, DeletionWorkflow, Navigator, Notifier, SessionManager,
};
use crate::storage::filesystem::FileTokenStore;
use crate::storage::TokenStore;
use anyhow::Result;
use std::sync::Arc;

pub struct Dashboard {
    session: Arc<SessionManager>,
    repository: Arc<ConversationRepository>,
    auth: AuthFlow,
    deletion: DeletionWorkflow,
}

impl Dashboard {
    /// Production wiring: HTTP backend from settings, token persisted on disk
    pub async fn from_settings(
        settings: &Settings,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let store = FileTokenStore::new(settings.session.storage_dir.clone()).await?;
        let api = HttpApiClient::new(settings.api.base_url.clone());
        tracing::debug!("Dashboard using backend {}", api.base_url());

        Ok(Self::with_parts(
            settings,
            Arc::new(api),
            Arc::new(store),
            navigator,
            notifier,
        ))
    }

    /// Wiring with explicit collaborators
    pub fn with_parts(
        settings: &Settings,
        api: Arc<dyn ConversationApi>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(store, navigator.clone()));
        let repository = Arc::new(ConversationRepository::new(api.clone(), session.clone()));
        let auth = AuthFlow::new(api, session.clone(), navigator.clone(), notifier.clone())
            .with_verify_redirect_delay(settings.verify_redirect_delay());
        let deletion = DeletionWorkflow::new(repository.clone(), navigator, notifier);

        Self {
            session,
            repository,
            auth,
            deletion,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn repository(&self) -> &ConversationRepository {
        &self.repository
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.auth
    }

    pub fn deletion(&self) -> &DeletionWorkflow {
        &self.deletion
    }
}
