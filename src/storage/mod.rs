//! Token Storage Abstraction
//!
//! Information Hiding:
//! - Storage backend implementation details hidden behind trait
//! - Allows swapping between memory and file persistence without API changes
//! - Each storage implementation encapsulates its own format

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

pub mod filesystem;
pub mod memory;

const BEARER_PREFIX: &str = "Bearer ";

/// Raw session credential. The auth scheme is added only when a request
/// header is built, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Strips a leading `Bearer ` left by older clients
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        let bare = trimmed
            .strip_prefix(BEARER_PREFIX)
            .or_else(|| trimmed.strip_prefix("bearer "))
            .unwrap_or(trimmed);
        Self(bare.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn authorization_header(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.0)
    }
}

// Keep credentials out of logs
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Trait defining token persistence
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns `None` when nothing has been saved
    async fn load(&self) -> Result<Option<Token>>;

    async fn save(&self, token: &Token) -> Result<()>;

    /// Clearing an empty store is not an error
    async fn clear(&self) -> Result<()>;
}
