pub mod client;
pub mod error;
pub mod models;

pub use client::{ConversationApi, Credentials, HttpApiClient, Registration};
pub use error::{ApiFailure, DashboardError};
pub use models::{Collection, Conversation, ConversationId, EmotionScores, Sentiment};
