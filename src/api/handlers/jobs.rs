//! Handlers for public job search and detail endpoints.

use axum::{Json, extract::State};

use crate::api::dto::jobs::{
    JobListResponse, JobResponse, JobSearchParams, SimilarJobsParams, SimilarJobsResponse,
};
use crate::api::extract::{ApiPath, ApiQuery, Client};
use crate::error::AppError;
use crate::state::AppState;

/// Searches active job postings.
///
/// # Endpoint
///
/// `GET /api/jobs`
///
/// # Query Parameters
///
/// - `search` - Substring of title, description or company name
/// - `location` - Substring of the location
/// - `type`, `experience_level`, `industry_id`, `is_remote`
/// - `salary_min` / `salary_max` - Overlap with the posted salary range
/// - `page`, `per_page` (default 15, max 100)
///
/// Featured and urgent postings come first, then the newest. Searches with a
/// term are recorded in the background.
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "jobs": [ ... ],
///   "pagination": { "current_page": 1, "last_page": 3, "per_page": 15, "total": 42 },
///   "filters": { "industries": [ ... ], "job_types": [ ... ], "experience_levels": [ ... ] }
/// }
/// ```
pub async fn job_list_handler(
    State(state): State<AppState>,
    client: Client,
    ApiQuery(params): ApiQuery<JobSearchParams>,
) -> Result<Json<JobListResponse>, AppError> {
    let page = state
        .job_service
        .search(
            params.filter(),
            params.pagination.page_request(),
            client.visitor(),
        )
        .await?;
    let filters = state.job_service.filter_options().await?;

    Ok(Json(JobListResponse {
        success: true,
        jobs: page.items,
        pagination: page.meta,
        filters,
    }))
}

/// `GET /api/jobs/{id}` - a published posting with company, industry and
/// skills. Drafts are reported as missing.
pub async fn job_show_handler(
    State(state): State<AppState>,
    client: Client,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.job_service.show(id, client.visitor()).await?;

    Ok(Json(JobResponse::new(job)))
}

/// `GET /api/jobs/{id}/similar?limit=5`
pub async fn similar_jobs_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<SimilarJobsParams>,
) -> Result<Json<SimilarJobsResponse>, AppError> {
    let jobs = state.job_service.similar(id, params.limit).await?;

    Ok(Json(SimilarJobsResponse {
        success: true,
        jobs,
    }))
}
