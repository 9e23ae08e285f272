//! Repository trait for job view and search analytics.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

/// A job detail page view to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub job_posting_id: i64,
    pub user_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// A search with a free-text term.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    pub user_id: Option<i64>,
    pub query: String,
    pub filters: Value,
    pub results_count: i64,
    pub ip: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Inserts a `job_views` row and increments the posting's `views_count`.
    async fn record_job_view(&self, view: JobView) -> Result<(), AppError>;

    async fn record_search(&self, search: SearchRecord) -> Result<(), AppError>;
}
