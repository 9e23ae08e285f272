//! Handlers for company profiles.

use axum::{Json, extract::State};

use crate::api::dto::companies::{
    CompanyJobsResponse, CompanyListParams, CompanyListResponse, CompanyResponse,
    UpdateCompanyRequest,
};
use crate::api::dto::pagination::PaginationParams;
use crate::api::extract::{ApiPath, ApiQuery, ValidJson};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/companies?search=acme` - active companies by name.
pub async fn company_list_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CompanyListParams>,
) -> Result<Json<CompanyListResponse>, AppError> {
    let page = state
        .company_service
        .list(params.search, params.pagination.page_request())
        .await?;

    Ok(Json(CompanyListResponse {
        success: true,
        companies: page.items,
        pagination: page.meta,
    }))
}

/// `GET /api/companies/{company}` - `company` is a numeric id or a slug.
pub async fn company_show_handler(
    State(state): State<AppState>,
    ApiPath(company): ApiPath<String>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = state.company_service.show(&company).await?;

    Ok(Json(CompanyResponse {
        success: true,
        company,
    }))
}

/// `GET /api/companies/{company}/jobs` - the company's open postings.
pub async fn company_jobs_handler(
    State(state): State<AppState>,
    ApiPath(company): ApiPath<String>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<CompanyJobsResponse>, AppError> {
    let (company, jobs) = state
        .company_service
        .jobs(&company, params.page_request())
        .await?;

    Ok(Json(CompanyJobsResponse {
        success: true,
        company,
        jobs,
    }))
}

/// `GET /api/employer/company`
pub async fn my_company_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = state.company_service.my_company(&auth.user).await?;

    Ok(Json(CompanyResponse {
        success: true,
        company,
    }))
}

/// Edits the employer's company profile.
///
/// # Endpoint
///
/// `PUT /api/employer/company`
///
/// Only company owners and admins may edit. Absent fields are left as they
/// are.
///
/// # Errors
///
/// - **403**: The user's company role cannot edit the profile
/// - **422**: Invalid URL, email or industry
pub async fn update_company_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = state
        .company_service
        .update_company(&auth.user, payload.into())
        .await?;

    Ok(Json(CompanyResponse {
        success: true,
        company,
    }))
}
