//! DTOs for job applications and saved jobs.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use super::pagination::PaginationParams;
use crate::application::services::{ApplicationDetail, StatusUpdate};
use crate::domain::entities::{ApplicationStatus, JobApplication, PageMeta, SavedJob};

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    pub job_posting_id: i64,

    #[validate(length(max = 5000, message = "The cover letter may not be greater than 5000 characters."))]
    pub cover_letter: Option<String>,

    #[validate(range(min = 0.0, message = "The expected salary must be at least 0."))]
    pub expected_salary: Option<f64>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<ApplicationStatus>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub job_posting_id: Option<i64>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,

    #[validate(length(max = 1000))]
    pub rejection_reason: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<UpdateStatusRequest> for StatusUpdate {
    fn from(req: UpdateStatusRequest) -> Self {
        Self {
            status: req.status,
            rejection_reason: req.rejection_reason,
            note: req.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub success: bool,
    pub applications: Vec<JobApplication>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub application: JobApplication,
}

#[derive(Debug, Serialize)]
pub struct ApplicationDetailResponse {
    pub success: bool,
    pub application: ApplicationDetail,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SaveJobRequest {
    #[validate(length(max = 1000, message = "The notes may not be greater than 1000 characters."))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedJobListResponse {
    pub success: bool,
    pub saved_jobs: Vec<SavedJob>,
    pub pagination: PageMeta,
}
