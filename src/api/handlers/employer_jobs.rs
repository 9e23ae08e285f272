//! Handlers for employer job management.
//!
//! Every endpoint acts on behalf of the employer's company. Changes to an
//! existing posting are limited to the user who posted it.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::MessageResponse;
use crate::api::dto::jobs::{
    CreateJobRequest, EmployerJobListResponse, EmployerJobsParams, JobResponse, UpdateJobRequest,
};
use crate::api::extract::{ApiPath, ApiQuery, ValidJson};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/employer/jobs?status=active&page=1`
pub async fn employer_job_list_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<EmployerJobsParams>,
) -> Result<Json<EmployerJobListResponse>, AppError> {
    let page = state
        .job_service
        .employer_jobs(&auth.user, params.status, params.pagination.page_request())
        .await?;

    Ok(Json(EmployerJobListResponse {
        success: true,
        jobs: page.items,
        pagination: page.meta,
    }))
}

/// Creates a draft posting.
///
/// # Endpoint
///
/// `POST /api/employer/jobs`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Backend Engineer",
///   "description": "...",
///   "type": "full-time",
///   "experience_level": "mid",
///   "location": "Nairobi",
///   "salary_min": 100000,
///   "salary_max": 150000,
///   "skill_ids": [1, 4]
/// }
/// ```
///
/// Currency defaults to `KES`, period to `monthly`, positions to 1.
///
/// # Response Codes
///
/// - **201 Created**: Posting stored as `draft`
/// - **403**: No company, no permission to post, or package limit reached
/// - **422**: Field errors
pub async fn create_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let draft = payload.into_draft()?;
    let job = state.job_service.create(&auth.user, draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobResponse::with_message(job, "Job posting created successfully")),
    ))
}

/// `GET /api/employer/jobs/{id}`
pub async fn employer_job_show_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.job_service.employer_show(&auth.user, id).await?;

    Ok(Json(JobResponse::new(job)))
}

/// `PUT /api/employer/jobs/{id}` - partial update; `null` clears optional
/// fields.
pub async fn update_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ValidJson(payload): ValidJson<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let patch = payload.into_patch()?;
    let job = state.job_service.update(&auth.user, id, patch).await?;

    Ok(Json(JobResponse::with_message(
        job,
        "Job posting updated successfully",
    )))
}

/// `DELETE /api/employer/jobs/{id}` - soft delete.
pub async fn delete_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.job_service.destroy(&auth.user, id).await?;

    Ok(Json(MessageResponse::new("Job posting deleted successfully")))
}

/// `POST /api/employer/jobs/{id}/publish`
///
/// # Errors
///
/// - **409**: The posting is already active, closed or expired
pub async fn publish_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.job_service.publish(&auth.user, id).await?;

    Ok(Json(JobResponse::with_message(
        job,
        "Job posting published successfully",
    )))
}

/// `POST /api/employer/jobs/{id}/pause`
pub async fn pause_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.job_service.pause(&auth.user, id).await?;

    Ok(Json(JobResponse::with_message(
        job,
        "Job posting paused successfully",
    )))
}
