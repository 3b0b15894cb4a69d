//! Conversation records as delivered by the backend
//!
//! Decoding is deliberately forgiving: optional text fields accept null or
//! non-string values as "absent", and emotion scores accept either the
//! object form or the classifier's list-of-labels form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of the conversation collection.
/// Readers share it; the repository publishes a new one on every change.
pub type Collection = Arc<[Conversation]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Fixed sentiment vocabulary, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Case-insensitive match against the vocabulary; anything else,
    /// including padded values, is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Sentiment::Positive => 0,
            Sentiment::Neutral => 1,
            Sentiment::Negative => 2,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotion label -> intensity, in the order the backend listed them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionScores(Vec<(String, f64)>);

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a score; non-finite values are dropped
    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        if !score.is_finite() {
            return;
        }
        let label = label.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = score,
            None => self.0.push((label, score)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, score)| (label.as_str(), *score))
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, score)| *score)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut scores = EmotionScores::new();
        for (label, score) in iter {
            scores.insert(label, score);
        }
        scores
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, score) in &self.0 {
            map.serialize_entry(label, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = EmotionScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of emotion scores or a list of {label, score} objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = EmotionScores::new();
                while let Some((label, value)) = access.next_entry::<String, Value>()? {
                    if let Some(score) = value.as_f64() {
                        scores.insert(label, score);
                    }
                }
                Ok(scores)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = EmotionScores::new();
                while let Some(item) = access.next_element::<Value>()? {
                    let label = item.get("label").and_then(Value::as_str);
                    let score = item.get("score").and_then(Value::as_f64);
                    if let (Some(label), Some(score)) = (label, score) {
                        scores.insert(label, score);
                    }
                }
                Ok(scores)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                d.deserialize_any(ScoresVisitor)
            }

            // Scalars carry no scores
            fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }

            fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
                Ok(EmotionScores::new())
            }
        }

        deserializer.deserialize_any(ScoresVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    /// Raw category token; see [`Conversation::sentiment`]
    #[serde(default, deserialize_with = "lenient_string")]
    pub sentiment_score: Option<String>,
    #[serde(default)]
    pub emotion_scores: EmotionScores,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transcript: Option<String>,
}

impl Conversation {
    pub fn new(id: impl Into<ConversationId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            created_at: None,
            summary: None,
            sentiment_score: None,
            emotion_scores: EmotionScores::new(),
            transcript: None,
        }
    }

    /// The name when present, otherwise `Conversation {id} - {date}`
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => match self.created_date() {
                Some(date) => format!("Conversation {} - {}", self.id, date.format("%Y-%m-%d")),
                None => format!("Conversation {}", self.id),
            },
        }
    }

    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.date())
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment_score.as_deref().and_then(Sentiment::parse)
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn transcript_text(&self) -> &str {
        self.transcript.as_deref().unwrap_or("")
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_timestamp(&s),
        _ => None,
    })
}

/// Accepts RFC 3339 (normalized to UTC) or the backend's naive ISO form
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Decodes a conversation list body. A non-array body yields an empty list;
/// elements that cannot be read as a conversation are skipped.
pub fn decode_collection(body: Value) -> Vec<Conversation> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            tracing::warn!(
                "[Models] Expected a list of conversations, got {}; treating as empty",
                json_kind(&other)
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Conversation>(item) {
            Ok(conversation) => Some(conversation),
            Err(e) => {
                tracing::warn!("[Models] Skipping unreadable conversation at index {}: {}", index, e);
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
