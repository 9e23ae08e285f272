//! Job applications and their status history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::enums::ApplicationStatus;

/// An application joined with the posting and applicant it links.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobApplication {
    pub id: i64,
    pub uuid: Uuid,
    pub job_posting_id: i64,
    pub job_title: String,
    pub company_id: i64,
    pub company_name: String,
    pub job_seeker_id: i64,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: Option<String>,
    pub expected_salary: Option<f64>,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub uuid: Uuid,
    pub job_posting_id: i64,
    pub job_seeker_id: i64,
    pub cover_letter: Option<String>,
    pub expected_salary: Option<f64>,
}

/// A status change to persist together with its history row.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub application_id: i64,
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
    pub changed_by: i64,
    pub rejection_reason: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_by: Option<i64>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filter for application listings.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub job_posting_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn application(id: i64, job_id: i64, seeker_id: i64) -> JobApplication {
        let now = Utc::now();
        JobApplication {
            id,
            uuid: Uuid::new_v4(),
            job_posting_id: job_id,
            job_title: "Backend Engineer".to_string(),
            company_id: 1,
            company_name: "Acme Ltd".to_string(),
            job_seeker_id: seeker_id,
            applicant_name: "Amina Otieno".to_string(),
            applicant_email: "amina@example.com".to_string(),
            cover_letter: None,
            expected_salary: None,
            status: ApplicationStatus::Submitted,
            rejection_reason: None,
            notes: None,
            reviewed_by: None,
            applied_at: now,
            updated_at: now,
        }
    }
}
