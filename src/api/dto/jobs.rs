//! DTOs for public job search and employer job management.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, NoneAsEmptyString, serde_as};
use validator::{Validate, ValidationError, ValidationErrors};

use super::pagination::PaginationParams;
use crate::application::services::{FilterOptions, JobDraft};
use crate::domain::entities::job_posting::DEFAULT_CURRENCY;
use crate::domain::entities::{
    ExperienceLevel, JobFilter, JobPatch, JobPosting, JobStatus, JobType, PageMeta, SalaryPeriod,
};
use crate::error::{AppError, into_result, push_field_error};

/// Public search query. Empty form fields count as absent.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct JobSearchParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub search: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub location: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, rename = "type")]
    pub job_type: Option<JobType>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub industry_id: Option<i64>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub is_remote: Option<bool>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub salary_min: Option<f64>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub salary_max: Option<f64>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl JobSearchParams {
    pub fn filter(&self) -> JobFilter {
        let trimmed = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        JobFilter {
            search: trimmed(&self.search),
            location: trimmed(&self.location),
            job_type: self.job_type,
            experience_level: self.experience_level,
            industry_id: self.industry_id,
            is_remote: self.is_remote,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct SimilarJobsParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct EmployerJobsParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status: Option<JobStatus>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

fn after_today(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        Ok(())
    } else {
        Err(ValidationError::new("after").with_message("The date must be a date after today.".into()))
    }
}

fn in_future(at: &DateTime<Utc>) -> Result<(), ValidationError> {
    after_today(&at.date_naive())
}

fn currency_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("size")
            .with_message("The salary currency must be a 3-letter code.".into()))
    }
}

fn check_salary_range(errors: &mut ValidationErrors, min: Option<f64>, max: Option<f64>) {
    if let (Some(min), Some(max)) = (min, max)
        && max < min
    {
        push_field_error(
            errors,
            "salary_max",
            "gte",
            "The salary max must be greater than or equal to salary min.",
        );
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 255, message = "The title field is required."))]
    pub title: String,

    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,

    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub industry_id: Option<i64>,

    #[serde(rename = "type")]
    pub job_type: JobType,

    pub experience_level: ExperienceLevel,

    #[validate(length(min = 1, max = 255, message = "The location field is required."))]
    pub location: String,

    #[serde(default)]
    pub is_remote: bool,

    #[validate(range(min = 0.0, message = "The salary min must be at least 0."))]
    pub salary_min: Option<f64>,

    #[validate(range(min = 0.0, message = "The salary max must be at least 0."))]
    pub salary_max: Option<f64>,

    #[validate(custom(function = "currency_code"))]
    pub salary_currency: Option<String>,

    pub salary_period: Option<SalaryPeriod>,

    #[serde(default)]
    pub salary_negotiable: bool,

    #[validate(range(min = 1, message = "The positions available must be at least 1."))]
    pub positions_available: Option<i32>,

    #[validate(custom(function = "after_today"))]
    pub application_deadline: Option<NaiveDate>,

    #[validate(custom(function = "in_future"))]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_urgent: bool,

    #[serde(default)]
    pub skill_ids: Vec<i64>,
}

impl CreateJobRequest {
    pub fn into_draft(self) -> Result<JobDraft, AppError> {
        let mut errors = ValidationErrors::new();
        check_salary_range(&mut errors, self.salary_min, self.salary_max);
        into_result(errors)?;

        Ok(JobDraft {
            industry_id: self.industry_id,
            title: self.title.trim().to_string(),
            description: self.description,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            benefits: self.benefits,
            job_type: self.job_type,
            experience_level: self.experience_level,
            location: self.location.trim().to_string(),
            is_remote: self.is_remote,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            salary_currency: self
                .salary_currency
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            salary_period: self.salary_period.unwrap_or(SalaryPeriod::Monthly),
            salary_negotiable: self.salary_negotiable,
            positions_available: self.positions_available.unwrap_or(1),
            application_deadline: self.application_deadline,
            expires_at: self.expires_at,
            is_urgent: self.is_urgent,
            skill_ids: self.skill_ids,
        })
    }
}

/// Partial update. Absent fields stay as they are; `null` clears a nullable
/// column.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub requirements: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub responsibilities: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub benefits: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub industry_id: Option<Option<i64>>,

    #[serde(rename = "type")]
    pub job_type: Option<JobType>,

    pub experience_level: Option<ExperienceLevel>,

    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    pub is_remote: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub salary_min: Option<Option<f64>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub salary_max: Option<Option<f64>>,

    #[validate(custom(function = "currency_code"))]
    pub salary_currency: Option<String>,

    pub salary_period: Option<SalaryPeriod>,

    pub salary_negotiable: Option<bool>,

    #[validate(range(min = 1, message = "The positions available must be at least 1."))]
    pub positions_available: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub application_deadline: Option<Option<NaiveDate>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,

    pub is_urgent: Option<bool>,

    pub skill_ids: Option<Vec<i64>>,
}

impl UpdateJobRequest {
    /// Checks the nullable fields and builds the patch. The combined salary
    /// range is checked against the stored posting by the service.
    pub fn into_patch(self) -> Result<JobPatch, AppError> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [("salary_min", self.salary_min), ("salary_max", self.salary_max)] {
            if matches!(value, Some(Some(v)) if v < 0.0) {
                push_field_error(&mut errors, field, "min", "The salary must be at least 0.");
            }
        }
        if let Some(Some(min)) = self.salary_min {
            check_salary_range(&mut errors, Some(min), self.salary_max.flatten());
        }
        if let Some(Some(deadline)) = self.application_deadline
            && let Err(e) = after_today(&deadline)
        {
            errors.add("application_deadline", e);
        }
        if let Some(Some(expires_at)) = self.expires_at
            && let Err(e) = in_future(&expires_at)
        {
            errors.add("expires_at", e);
        }
        into_result(errors)?;

        Ok(JobPatch {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            benefits: self.benefits,
            industry_id: self.industry_id,
            job_type: self.job_type,
            experience_level: self.experience_level,
            location: self.location.map(|l| l.trim().to_string()),
            is_remote: self.is_remote,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            salary_currency: self.salary_currency.map(|c| c.to_uppercase()),
            salary_period: self.salary_period,
            salary_negotiable: self.salary_negotiable,
            positions_available: self.positions_available,
            application_deadline: self.application_deadline,
            expires_at: self.expires_at,
            is_urgent: self.is_urgent,
            skill_ids: self.skill_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<JobPosting>,
    pub pagination: PageMeta,
    pub filters: FilterOptions,
}

#[derive(Debug, Serialize)]
pub struct EmployerJobListResponse {
    pub success: bool,
    pub jobs: Vec<JobPosting>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub job: JobPosting,
}

impl JobResponse {
    pub fn new(job: JobPosting) -> Self {
        Self {
            success: true,
            message: None,
            job,
        }
    }

    pub fn with_message(job: JobPosting, message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            job,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimilarJobsResponse {
    pub success: bool,
    pub jobs: Vec<JobPosting>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;
    use serde_json::json;

    fn search(query: &str) -> JobSearchParams {
        let uri: Uri = format!("/api/jobs?{query}").parse().unwrap();
        let Query(params) = Query::try_from_uri(&uri).unwrap();
        params
    }

    #[test]
    fn test_search_params_parse_enums_and_numbers() {
        let params = search("search=+rust+&type=full-time&industry_id=4&is_remote=true&page=2");
        let filter = params.filter();
        assert_eq!(filter.search.as_deref(), Some("rust"));
        assert_eq!(filter.job_type, Some(JobType::FullTime));
        assert_eq!(filter.industry_id, Some(4));
        assert_eq!(filter.is_remote, Some(true));
        assert_eq!(params.pagination.page, Some(2));
    }

    #[test]
    fn test_empty_form_fields_are_ignored() {
        let filter = search("search=&type=&experience_level=&salary_min=").filter();
        assert_eq!(filter, JobFilter::default());
    }

    fn create_body() -> serde_json::Value {
        json!({
            "title": "Backend Engineer",
            "description": "Build services",
            "type": "full-time",
            "experience_level": "mid",
            "location": "Nairobi",
            "salary_min": 100000.0,
            "salary_max": 150000.0
        })
    }

    #[test]
    fn test_create_defaults() {
        let req: CreateJobRequest = serde_json::from_value(create_body()).unwrap();
        assert!(req.validate().is_ok());

        let draft = req.into_draft().unwrap();
        assert_eq!(draft.salary_currency, "KES");
        assert_eq!(draft.salary_period, SalaryPeriod::Monthly);
        assert_eq!(draft.positions_available, 1);
        assert!(draft.skill_ids.is_empty());
    }

    #[test]
    fn test_create_rejects_inverted_salary() {
        let mut body = create_body();
        body["salary_max"] = json!(50.0);
        let req: CreateJobRequest = serde_json::from_value(body).unwrap();
        let err = req.into_draft().unwrap_err();
        assert_eq!(err.field_messages()[0].0, "salary_max");
    }

    #[test]
    fn test_create_rejects_past_deadline() {
        let mut body = create_body();
        body["application_deadline"] = json!("2020-01-01");
        body["salary_currency"] = json!("KSHS");
        let req: CreateJobRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("application_deadline"));
        assert!(errors.field_errors().contains_key("salary_currency"));
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let req: UpdateJobRequest =
            serde_json::from_value(json!({"benefits": null, "title": "Lead"})).unwrap();
        let patch = req.into_patch().unwrap();
        assert_eq!(patch.benefits, Some(None));
        assert_eq!(patch.requirements, None);
        assert_eq!(patch.title.as_deref(), Some("Lead"));
    }

    #[test]
    fn test_update_rejects_negative_salary() {
        let req: UpdateJobRequest =
            serde_json::from_value(json!({"salary_min": -1.0})).unwrap();
        assert!(req.into_patch().is_err());
    }
}
