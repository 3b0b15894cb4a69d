//! In-Memory Token Storage
//!
//! Information Hiding:
//! - Thread-safe access via RwLock hidden behind async interface
//! - Suitable for testing and ephemeral sessions

use super::{Token, TokenStore};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Token lives only as long as the process
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<Token>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token))),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<Token>> {
        let token = self.token.read().await.clone();
        tracing::debug!("[InMemoryTokenStore] Loaded token (present: {})", token.is_some());
        Ok(token)
    }

    async fn save(&self, token: &Token) -> Result<()> {
        *self.token.write().await = Some(token.clone());
        tracing::debug!("[InMemoryTokenStore] Saved token");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        tracing::debug!("[InMemoryTokenStore] Cleared token");
        Ok(())
    }
}
