//! Background worker persisting analytics events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::analytics_event::AnalyticsEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

const MAX_RETRIES: usize = 3;

/// Consumes events until every sender is dropped.
///
/// At most `concurrency` events are written at once. Each write is retried
/// with exponential backoff; events that still fail are logged and counted,
/// never re-queued. Returns after in-flight writes have finished.
pub async fn run_analytics_worker<R>(
    mut rx: mpsc::Receiver<AnalyticsEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: AnalyticsRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            process_event(repository.as_ref(), event).await;
        });
    }

    // Wait for in-flight writes.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Analytics worker stopped");
}

async fn process_event<R>(repository: &R, event: AnalyticsEvent)
where
    R: AnalyticsRepository + ?Sized,
{
    let kind = event.kind();
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result: Result<(), AppError> = Retry::start(strategy, || {
        let event = event.clone();
        async move {
            match event {
                AnalyticsEvent::JobViewed(view) => repository.record_job_view(view).await,
                AnalyticsEvent::JobSearched(search) => repository.record_search(search).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("analytics_events_processed_total", "kind" => kind).increment(1);
            debug!(kind, "Analytics event recorded");
        }
        Err(e) => {
            metrics::counter!("analytics_events_failed_total", "kind" => kind).increment(1);
            error!(kind, error = %e, "Failed to record analytics event after retries");
        }
    }
}
