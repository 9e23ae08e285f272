//! Analytics events handed from request handlers to the background worker.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::domain::repositories::{JobView, SearchRecord};

/// A view or search to record off the request path.
///
/// Handlers publish events with [`publish`]; the response never waits for
/// the database write. Processed by
/// [`crate::domain::analytics_worker::run_analytics_worker`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    JobViewed(JobView),
    JobSearched(SearchRecord),
}

impl AnalyticsEvent {
    /// Label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JobViewed(_) => "job_view",
            Self::JobSearched(_) => "search",
        }
    }
}

/// Queues an event without blocking.
///
/// Returns `false` when the event was dropped because the queue is full or
/// the worker has stopped.
pub fn publish(sender: &mpsc::Sender<AnalyticsEvent>, event: AnalyticsEvent) -> bool {
    let kind = event.kind();

    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            metrics::counter!("analytics_events_dropped_total", "kind" => kind, "reason" => "full")
                .increment(1);
            warn!(kind, "Analytics queue full, dropping event");
            false
        }
        Err(TrySendError::Closed(_)) => {
            metrics::counter!("analytics_events_dropped_total", "kind" => kind, "reason" => "closed")
                .increment(1);
            warn!(kind, "Analytics worker stopped, dropping event");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(job_id: i64) -> AnalyticsEvent {
        AnalyticsEvent::JobViewed(JobView {
            job_posting_id: job_id,
            user_id: None,
            ip: Some("10.0.0.1".to_string()),
            user_agent: None,
            referer: None,
        })
    }

    #[test]
    fn test_kind() {
        assert_eq!(view(1).kind(), "job_view");

        let search = AnalyticsEvent::JobSearched(SearchRecord {
            user_id: None,
            query: "rust".to_string(),
            filters: json!({}),
            results_count: 3,
            ip: None,
        });
        assert_eq!(search.kind(), "search");
    }

    #[tokio::test]
    async fn test_publish_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);

        assert!(publish(&tx, view(1)));
        assert!(!publish(&tx, view(2)));

        assert_eq!(rx.recv().await, Some(view(1)));
    }

    #[tokio::test]
    async fn test_publish_drops_when_closed() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);

        assert!(!publish(&tx, view(1)));
    }
}
