//! Job posting entity, search filter and write models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::company::Skill;
use super::enums::{ExperienceLevel, JobStatus, JobType, SalaryPeriod};

/// Default currency for salaries when none is given.
pub const DEFAULT_CURRENCY: &str = "KES";

/// A job posting joined with its company and industry names.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPosting {
    pub id: i64,
    pub uuid: Uuid,
    pub company_id: i64,
    pub company_name: String,
    pub company_slug: String,
    pub posted_by_user_id: i64,
    pub industry_id: Option<i64>,
    pub industry_name: Option<String>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub job_type: JobType,
    #[sqlx(try_from = "String")]
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub is_remote: bool,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: String,
    #[sqlx(try_from = "String")]
    pub salary_period: SalaryPeriod,
    pub salary_negotiable: bool,
    pub positions_available: i32,
    pub application_deadline: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_featured: bool,
    pub is_urgent: bool,
    pub views_count: i64,
    pub applications_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl JobPosting {
    /// Active, not expired and visible in public search.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Active && self.expires_at.is_none_or(|e| e > now)
    }

    /// Applications are accepted while open and before the deadline day ends.
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.is_open(now)
            && self
                .application_deadline
                .is_none_or(|deadline| deadline >= now.date_naive())
    }
}

/// Public search criteria. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobFilter {
    /// Case-insensitive match on title, description or company name.
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub industry_id: Option<i64>,
    pub is_remote: Option<bool>,
    /// Jobs whose maximum salary reaches at least this value.
    pub salary_min: Option<f64>,
    /// Jobs whose minimum salary does not exceed this value.
    pub salary_max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub uuid: Uuid,
    pub company_id: i64,
    pub posted_by_user_id: i64,
    pub industry_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub is_remote: bool,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: String,
    pub salary_period: SalaryPeriod,
    pub salary_negotiable: bool,
    pub positions_available: i32,
    pub application_deadline: Option<NaiveDate>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_urgent: bool,
    pub skill_ids: Vec<i64>,
}

/// Partial update for a posting.
///
/// `None` leaves a column unchanged. For nullable columns `Some(None)` clears
/// the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Option<String>>,
    pub responsibilities: Option<Option<String>>,
    pub benefits: Option<Option<String>>,
    pub industry_id: Option<Option<i64>>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub salary_min: Option<Option<f64>>,
    pub salary_max: Option<Option<f64>>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<SalaryPeriod>,
    pub salary_negotiable: Option<bool>,
    pub positions_available: Option<i32>,
    pub application_deadline: Option<Option<NaiveDate>>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub is_urgent: Option<bool>,
    pub skill_ids: Option<Vec<i64>>,
}

impl JobPatch {
    /// Salary bounds after applying the patch on top of the current values.
    pub fn effective_salary(&self, current: &JobPosting) -> (Option<f64>, Option<f64>) {
        (
            self.salary_min.unwrap_or(current.salary_min),
            self.salary_max.unwrap_or(current.salary_max),
        )
    }
}

/// A saved job as listed for its job seeker.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SavedJob {
    pub id: i64,
    pub job_posting_id: i64,
    pub notes: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub title: String,
    pub slug: String,
    pub company_name: String,
    pub location: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub job_type: JobType,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
}
