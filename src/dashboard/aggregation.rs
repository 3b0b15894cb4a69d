//! Emotion and sentiment aggregation for charts
//!
//! Total functions over whatever the backend delivered: malformed or missing
//! fields contribute nothing and never produce an error.

use crate::core::{Conversation, Sentiment};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionTotal {
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentimentBucket {
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Always the three categories, in `Sentiment::ALL` order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SentimentDistribution([SentimentBucket; 3]);

impl SentimentDistribution {
    fn empty() -> Self {
        Self(Sentiment::ALL.map(|sentiment| SentimentBucket { sentiment, count: 0 }))
    }

    pub fn buckets(&self) -> &[SentimentBucket; 3] {
        &self.0
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.0[sentiment.index()].count
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|b| b.count).sum()
    }
}

/// Sums every label's scores across the collection, highest total first.
/// Ties keep the order in which labels were first seen.
pub fn aggregate_emotions(conversations: &[Conversation]) -> Vec<EmotionTotal> {
    let mut totals: Vec<EmotionTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for conversation in conversations {
        for (label, score) in conversation.emotion_scores.iter() {
            match positions.get(label).copied() {
                Some(index) => totals[index].total += score,
                None => {
                    positions.insert(label, totals.len());
                    totals.push(EmotionTotal {
                        label: label.to_string(),
                        total: score,
                    });
                }
            }
        }
    }

    // sort_by is stable
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Counts conversations per sentiment category; unknown values are dropped
pub fn aggregate_sentiments(conversations: &[Conversation]) -> SentimentDistribution {
    let mut distribution = SentimentDistribution::empty();
    for conversation in conversations {
        if let Some(sentiment) = conversation.sentiment() {
            distribution.0[sentiment.index()].count += 1;
        }
    }
    distribution
}

/// Both aggregations plus the collection size, ready to serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub emotions: Vec<EmotionTotal>,
    pub sentiments: SentimentDistribution,
}

impl DashboardStats {
    pub fn compute(conversations: &[Conversation]) -> Self {
        Self {
            total: conversations.len(),
            emotions: aggregate_emotions(conversations),
            sentiments: aggregate_sentiments(conversations),
        }
    }
}
