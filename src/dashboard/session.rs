//! Session Manager - owns the authentication token
//!
//! Information Hiding:
//! - Token persistence delegated to a `TokenStore`
//! - Token cached after the first load
//! - Redirect on invalidation requested through the `Navigator`

use super::navigation::{Navigator, Route};
use crate::core::DashboardError;
use crate::storage::{Token, TokenStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Destination whenever a protected operation finds no usable session
pub const LOGIN_ROUTE: Route = Route::Login;

pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    // Outer `None` means storage has not been read yet
    cached: RwLock<Option<Option<Token>>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            cached: RwLock::new(None),
        }
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub async fn get_token(&self) -> Option<Token> {
        if let Some(token) = self.cached.read().await.as_ref() {
            return token.clone();
        }

        let mut cached = self.cached.write().await;
        if let Some(token) = cached.as_ref() {
            return token.clone();
        }

        let loaded = match self.store.load().await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("[SessionManager] Failed to load token, treating as absent: {:#}", e);
                None
            }
        };
        *cached = Some(loaded.clone());
        loaded
    }

    pub async fn set_token(&self, token: Token) -> Result<(), DashboardError> {
        if token.is_empty() {
            return Err(DashboardError::ValidationFailure(
                "Received an empty access token".to_string(),
            ));
        }

        let mut cached = self.cached.write().await;
        self.store.save(&token).await?;
        *cached = Some(Some(token));
        tracing::info!("[SessionManager] Session token stored");
        Ok(())
    }

    /// Forgets the token in memory even if the store cannot be cleared
    pub async fn clear(&self) {
        let mut cached = self.cached.write().await;
        *cached = Some(None);
        if let Err(e) = self.store.clear().await {
            tracing::warn!("[SessionManager] Failed to clear stored token: {:#}", e);
        }
        tracing::info!("[SessionManager] Session cleared");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.get_token().await.is_some()
    }

    /// Gate for every protected operation: redirects and fails when no
    /// token is present, so the caller never reaches the network.
    pub async fn require_token_or_redirect(&self) -> Result<Token, DashboardError> {
        match self.get_token().await {
            Some(token) => Ok(token),
            None => {
                tracing::info!("[SessionManager] No token present, redirecting to {}", LOGIN_ROUTE);
                self.navigator.redirect(LOGIN_ROUTE);
                Err(DashboardError::Unauthenticated)
            }
        }
    }

    /// Reaction to a 401 from any protected endpoint
    pub async fn handle_unauthorized(&self) {
        tracing::warn!("[SessionManager] Backend rejected the session token");
        self.clear().await;
        self.navigator.redirect(LOGIN_ROUTE);
    }
}
