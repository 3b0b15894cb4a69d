//! File System Token Storage
//!
//! Information Hiding:
//! - File path and JSON format hidden from users
//! - Directory creation handled on construction
//! - Persistence survives process restarts

use super::{Token, TokenStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Stores the token as {base_path}/session.json
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub async fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)
            .await
            .context("Failed to create session directory")?;

        Ok(Self {
            path: base_path.join(SESSION_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Token>> {
        if !self.path.exists() {
            tracing::debug!("[FileTokenStore] No session file at {:?}", self.path);
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .await
            .context(format!("Failed to read session file: {:?}", self.path))?;

        let file: SessionFile =
            serde_json::from_str(&json).context("Failed to deserialize session file")?;

        let token = Token::new(file.token);
        if token.is_empty() {
            tracing::debug!("[FileTokenStore] Session file holds an empty token");
            return Ok(None);
        }

        tracing::debug!("[FileTokenStore] Loaded token from {:?}", self.path);
        Ok(Some(token))
    }

    async fn save(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_string_pretty(&SessionFile {
            token: token.as_str().to_string(),
        })
        .context("Failed to serialize session file")?;

        fs::write(&self.path, json)
            .await
            .context(format!("Failed to write session file: {:?}", self.path))?;

        tracing::debug!("[FileTokenStore] Saved token to {:?}", self.path);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .context(format!("Failed to delete session file: {:?}", self.path))?;
            tracing::debug!("[FileTokenStore] Removed {:?}", self.path);
        } else {
            tracing::debug!("[FileTokenStore] No session file to remove");
        }
        Ok(())
    }
}
