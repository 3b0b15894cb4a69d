//! Text normalization and multi-field conversation search
//!
//! Information Hiding:
//! - Normalization rules live here only; queries and fields go through the same path
//! - `SearchIndex` keeps normalized haystacks per snapshot and the last result
//! - Views are indices into an immutable snapshot, never copies that could drift

use crate::core::{Collection, Conversation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9 ]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lower-cases, turns everything outside `[a-z0-9 ]` into a space,
/// collapses whitespace runs and trims.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = NON_ALPHANUMERIC.replace_all(&lowered, " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}

/// Normalized searchable fields of one conversation, kept separate so a
/// match never spans two fields.
fn haystacks(conversation: &Conversation) -> [String; 4] {
    [
        normalize(&conversation.display_name()),
        normalize(conversation.transcript_text()),
        normalize(conversation.summary_text()),
        normalize(conversation.sentiment_score.as_deref().unwrap_or("")),
    ]
}

fn matches(fields: &[String; 4], needle: &str) -> bool {
    fields.iter().any(|field| field.contains(needle))
}

/// Conversations whose name, transcript, summary or sentiment contains the
/// normalized query. An empty query keeps everything. Original order.
pub fn filter<'a>(conversations: &'a [Conversation], query: &str) -> Vec<&'a Conversation> {
    let needle = normalize(query);
    if needle.is_empty() {
        return conversations.iter().collect();
    }
    conversations
        .iter()
        .filter(|c| matches(&haystacks(c), &needle))
        .collect()
}

/// Filtered view over one snapshot
#[derive(Debug, Clone)]
pub struct FilteredView {
    collection: Collection,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.indices.iter().map(|&i| &self.collection[i])
    }

    pub fn to_vec(&self) -> Vec<Conversation> {
        self.iter().cloned().collect()
    }

    /// Size of the snapshot the view was computed from
    pub fn source_len(&self) -> usize {
        self.collection.len()
    }
}

/// Memoizing search over the current collection.
///
/// Normalized fields are rebuilt when a different snapshot is passed in;
/// the match list is rebuilt when either the snapshot or the normalized
/// query changes.
#[derive(Default)]
pub struct SearchIndex {
    source: Option<Collection>,
    fields: Vec<[String; 4]>,
    query: String,
    view: Option<FilteredView>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, collection: &Collection, query: &str) -> &FilteredView {
        let snapshot_changed = !self
            .source
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, collection));

        if snapshot_changed {
            tracing::debug!("[SearchIndex] Indexing {} conversations", collection.len());
            self.fields = collection.iter().map(haystacks).collect();
            self.source = Some(collection.clone());
            self.view = None;
        }

        let needle = normalize(query);
        if needle != self.query {
            self.query = needle;
            self.view = None;
        }

        let fields = &self.fields;
        let needle = &self.query;
        self.view.get_or_insert_with(|| {
            let indices = fields
                .iter()
                .enumerate()
                .filter(|(_, f)| needle.is_empty() || matches(f, needle))
                .map(|(i, _)| i)
                .collect();
            FilteredView {
                collection: collection.clone(),
                indices,
            }
        })
    }

    /// Normalized form of the last query
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: i64, name: &str, sentiment: &str) -> Conversation {
        let mut c = Conversation::new(id);
        c.name = Some(name.to_string());
        c.sentiment_score = Some(sentiment.to_string());
        c
    }

    fn sample() -> Vec<Conversation> {
        vec![
            conversation(1, "Billing Call", "negative"),
            conversation(2, "Feedback", "positive"),
        ]
    }

    fn ids<'a>(items: impl IntoIterator<Item = &'a Conversation>) -> Vec<i64> {
        items.into_iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize("Hello, World!"), "hello world");
        assert_eq!(normalize("  Multi\t\nline   text "), "multi line text");
        assert_eq!(normalize("café-au-lait"), "caf au lait");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["Hello, World!", " a--b  C ", "ÀÉÎ 123", "\tTabs\u{00a0}nbsp"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let conversations = sample();
        assert_eq!(ids(filter(&conversations, "")), vec![1, 2]);
        assert_eq!(ids(filter(&conversations, " ?! ")), vec![1, 2]);
    }

    #[test]
    fn test_filter_matches_any_field() {
        let conversations = sample();
        assert_eq!(ids(filter(&conversations, "billing")), vec![1]);
        // "Feedback" and "negative" both contain an e
        assert_eq!(ids(filter(&conversations, "e")), vec![1, 2]);
        assert_eq!(ids(filter(&conversations, "POSITIVE")), vec![2]);
        assert!(filter(&conversations, "refund").is_empty());
    }

    #[test]
    fn test_filter_ignores_punctuation() {
        let mut c = Conversation::new(3);
        c.transcript = Some("Customer said: I can't log-in!".to_string());
        c.summary = Some("Login issue".to_string());
        let conversations = vec![c];

        assert_eq!(ids(filter(&conversations, "can't log in")), vec![3]);
        assert_eq!(ids(filter(&conversations, "LOG-IN")), vec![3]);
        assert_eq!(ids(filter(&conversations, "login issue")), vec![3]);
    }

    #[test]
    fn test_filter_matches_fallback_label() {
        let conversations = vec![Conversation::new(42)];
        assert_eq!(ids(filter(&conversations, "conversation 42")), vec![42]);
    }

    #[test]
    fn test_index_recomputes_on_query_and_snapshot_change() {
        let first: Collection = sample().into();
        let mut index = SearchIndex::new();

        assert_eq!(ids(index.view(&first, "billing").iter()), vec![1]);
        assert_eq!(ids(index.view(&first, "feedback").iter()), vec![2]);
        assert_eq!(index.query(), "feedback");

        let second: Collection = vec![conversation(3, "Feedback again", "neutral")].into();
        let view = index.view(&second, "feedback");
        assert_eq!(ids(view.iter()), vec![3]);
        assert_eq!(view.source_len(), 1);
    }

    #[test]
    fn test_index_view_keeps_snapshot_alive() {
        let mut index = SearchIndex::new();
        let collection: Collection = sample().into();
        let view = index.view(&collection, "").clone();
        drop(collection);
        assert_eq!(view.len(), 2);
        assert_eq!(view.to_vec()[0].id.0, 1);
    }
}
