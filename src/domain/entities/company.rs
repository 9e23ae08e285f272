//! Companies, memberships and reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::CompanyRole;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Company {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub slug: String,
    pub industry_id: Option<i64>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a company together with the company itself.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CompanyMembership {
    pub company_id: i64,
    pub company_name: String,
    pub company_slug: String,
    #[sqlx(try_from = "String")]
    pub role_type: CompanyRole,
    pub is_primary_contact: bool,
    pub can_post_jobs: bool,
    pub can_manage_applications: bool,
    pub can_manage_billing: bool,
    pub joined_at: DateTime<Utc>,
}

/// Editable company fields. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub industry_id: Option<i64>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.industry_id.is_none()
            && self.website.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Industry {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub slug: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert!(CompanyPatch::default().is_empty());

        let patch = CompanyPatch {
            description: Some("We build things".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
