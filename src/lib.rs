//! Conversight - client for browsing and analysing recorded customer conversations
//!
//! This library gates every data access on an authentication token, caches
//! the conversation collection, and derives chart series and search views
//! from it.

mod config;
pub mod core;
pub mod dashboard;
pub mod storage;
pub mod utils;

pub mod api;
pub mod cli;

pub use api::Dashboard;
pub use crate::config::Settings;

pub use crate::core::{Collection, Conversation, ConversationId, DashboardError, Sentiment};
pub use storage::Token;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
}
