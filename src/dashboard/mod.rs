//! Session-gated conversation analytics and retrieval
//!
//! Leaf-first: `session` gates `repository`; `aggregation` and `search`
//! derive views from the repository's snapshots; `deletion` mutates the
//! collection through the repository; `auth` drives the login lifecycle.

pub mod aggregation;
pub mod auth;
pub mod deletion;
pub mod navigation;
pub mod repository;
pub mod search;
pub mod session;
pub mod view;

pub use aggregation::{aggregate_emotions, aggregate_sentiments, DashboardStats, EmotionTotal, SentimentDistribution};
pub use auth::AuthFlow;
pub use deletion::{DeletionOutcome, DeletionState, DeletionWorkflow};
pub use navigation::{Navigator, Notification, NotificationLevel, Notifier, Route};
pub use repository::{CacheState, ConversationRepository, Listing};
pub use search::{filter, normalize, FilteredView, SearchIndex};
pub use session::SessionManager;
pub use view::{sort_by_created, SortOrder, ViewScope};
