//! Consumer lifetimes for in-flight loads, and display ordering
//!
//! A view that is torn down while a fetch is outstanding must not apply the
//! result. The transport call itself is left to finish.

use crate::core::Conversation;
use std::cmp::Ordering as CmpOrdering;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ViewScope {
    open: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            tracing::debug!("[ViewScope] Closed; pending results will be discarded");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// `None` when the scope closed before `future` resolved
    pub async fn run<F: Future>(&self, future: F) -> Option<F::Output> {
        let output = future.await;
        if self.is_open() {
            Some(output)
        } else {
            tracing::debug!("[ViewScope] Discarding result for a closed view");
            None
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

/// Display-only reordering by `created_at`. Undated conversations go last;
/// equal timestamps keep their collection order.
pub fn sort_by_created<'a>(
    conversations: impl IntoIterator<Item = &'a Conversation>,
    order: SortOrder,
) -> Vec<&'a Conversation> {
    let mut sorted: Vec<&Conversation> = conversations.into_iter().collect();
    sorted.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => match order {
            SortOrder::NewestFirst => y.cmp(&x),
            SortOrder::OldestFirst => x.cmp(&y),
        },
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::parse_timestamp;
    use std::time::Duration;

    fn dated(id: i64, ts: Option<&str>) -> Conversation {
        let mut c = Conversation::new(id);
        c.created_at = ts.and_then(parse_timestamp);
        c
    }

    #[test]
    fn test_sort_by_created() {
        let conversations = vec![
            dated(1, Some("2024-01-02T00:00:00")),
            dated(2, None),
            dated(3, Some("2024-03-01T00:00:00")),
            dated(4, Some("2024-01-02T00:00:00")),
        ];

        let newest: Vec<i64> = sort_by_created(&conversations, SortOrder::NewestFirst)
            .iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(newest, vec![3, 1, 4, 2]);

        let oldest: Vec<i64> = sort_by_created(&conversations, SortOrder::OldestFirst)
            .iter()
            .map(|c| c.id.0)
            .collect();
        assert_eq!(oldest, vec![1, 4, 3, 2]);
    }

    #[tokio::test]
    async fn test_open_scope_delivers_result() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 5 }).await, Some(5));
    }

    #[tokio::test]
    async fn test_result_discarded_after_teardown() {
        let scope = ViewScope::new();
        let teardown = scope.clone();

        let pending = scope.run(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "loaded"
        });
        let closer = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            teardown.close();
        };

        let (result, ()) = tokio::join!(pending, closer);
        assert_eq!(result, None);
        assert!(!scope.is_open());
    }
}
