//! DTOs for company profiles.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use super::pagination::PaginationParams;
use crate::domain::entities::{Company, CompanyPatch, JobPosting, PageMeta};

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct CompanyListParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub search: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub industry_id: Option<i64>,

    #[validate(url(message = "The website must be a valid URL."))]
    pub website: Option<String>,

    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

impl From<UpdateCompanyRequest> for CompanyPatch {
    fn from(req: UpdateCompanyRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            industry_id: req.industry_id,
            website: req.website,
            email: req.email.map(|e| e.trim().to_lowercase()),
            phone: req.phone,
            description: req.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub success: bool,
    pub companies: Vec<Company>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub success: bool,
    pub company: Company,
}

#[derive(Debug, Serialize)]
pub struct CompanyJobsResponse {
    pub success: bool,
    pub company: Company,
    pub jobs: Vec<JobPosting>,
}
