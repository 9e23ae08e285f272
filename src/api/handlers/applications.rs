//! Handlers for job applications and saved jobs.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::MessageResponse;
use crate::api::dto::applications::{
    ApplicationDetailResponse, ApplicationListParams, ApplicationListResponse,
    ApplicationResponse, ApplyRequest, SaveJobRequest, SavedJobListResponse, UpdateStatusRequest,
};
use crate::api::dto::pagination::PaginationParams;
use crate::api::extract::{ApiPath, ApiQuery, OptionalJson, ValidJson};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/applications?status=submitted` - the seeker's own applications.
pub async fn my_applications_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ApplicationListParams>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let page = state
        .application_service
        .my_applications(&auth.user, params.status, params.pagination.page_request())
        .await?;

    Ok(Json(ApplicationListResponse {
        success: true,
        applications: page.items,
        pagination: page.meta,
    }))
}

/// Applies to a job.
///
/// # Endpoint
///
/// `POST /api/applications`
///
/// # Request Body
///
/// ```json
/// { "job_posting_id": 12, "cover_letter": "...", "expected_salary": 120000 }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: Application submitted
/// - **404**: Unknown job or no job seeker profile
/// - **409**: Already applied to this job
/// - **422**: The job is closed or past its deadline
pub async fn apply_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    let application = state
        .application_service
        .apply(
            &auth.user,
            payload.job_posting_id,
            payload.cover_letter,
            payload.expected_salary,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            success: true,
            message: Some("Application submitted successfully"),
            application,
        }),
    ))
}

/// `GET /api/applications/{id}` - with its status history.
pub async fn application_show_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApplicationDetailResponse>, AppError> {
    let application = state.application_service.show(&auth.user, id).await?;

    Ok(Json(ApplicationDetailResponse {
        success: true,
        application,
    }))
}

/// `POST /api/applications/{id}/withdraw`
pub async fn withdraw_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = state.application_service.withdraw(&auth.user, id).await?;

    Ok(Json(ApplicationResponse {
        success: true,
        message: Some("Application withdrawn successfully"),
        application,
    }))
}

/// `GET /api/employer/applications?job_posting_id=3&status=reviewing`
pub async fn employer_applications_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ApplicationListParams>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let page = state
        .application_service
        .employer_applications(
            &auth.user,
            params.job_posting_id,
            params.status,
            params.pagination.page_request(),
        )
        .await?;

    Ok(Json(ApplicationListResponse {
        success: true,
        applications: page.items,
        pagination: page.meta,
    }))
}

/// Moves an application through the review pipeline.
///
/// # Endpoint
///
/// `PUT /api/employer/applications/{id}/status`
///
/// # Errors
///
/// - **403**: No permission to manage applications
/// - **409**: The transition is not allowed from the current status
pub async fn update_status_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ValidJson(payload): ValidJson<UpdateStatusRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let application = state
        .application_service
        .update_status(&auth.user, id, payload.into())
        .await?;

    Ok(Json(ApplicationResponse {
        success: true,
        message: Some("Application status updated successfully"),
        application,
    }))
}

/// `GET /api/saved-jobs`
pub async fn saved_jobs_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<SavedJobListResponse>, AppError> {
    let page = state
        .saved_job_service
        .saved_jobs(&auth.user, params.page_request())
        .await?;

    Ok(Json(SavedJobListResponse {
        success: true,
        saved_jobs: page.items,
        pagination: page.meta,
    }))
}

/// Saves a job for later.
///
/// # Endpoint
///
/// `POST /api/saved-jobs/{job}/save`
///
/// An optional `{"notes": "..."}` body is stored with the bookmark.
///
/// # Response Codes
///
/// - **201 Created**: Job saved
/// - **200 OK**: Job was already saved
/// - **404**: Unknown job or no job seeker profile
pub async fn save_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(job_id): ApiPath<i64>,
    OptionalJson(payload): OptionalJson<SaveJobRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let created = state
        .saved_job_service
        .save_job(&auth.user, job_id, payload.notes)
        .await?;

    Ok(if created {
        (
            StatusCode::CREATED,
            Json(MessageResponse::new("Job saved successfully")),
        )
    } else {
        (StatusCode::OK, Json(MessageResponse::new("Job already saved")))
    })
}

/// `DELETE /api/saved-jobs/{job}/unsave`
pub async fn unsave_job_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(job_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .saved_job_service
        .unsave_job(&auth.user, job_id)
        .await?;

    Ok(Json(MessageResponse::new("Job unsaved successfully")))
}
