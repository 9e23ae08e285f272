//! PostgreSQL implementation of the company repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Company, CompanyMembership, CompanyPatch, Industry, Skill};
use crate::domain::repositories::CompanyRepository;
use crate::error::AppError;

const COMPANY_COLUMNS: &str = r#"
    id, uuid, name, slug, industry_id, website, email, phone, description, logo_url,
    is_verified, is_featured, is_active, created_at, updated_at
"#;

pub struct PgCompanyRepository {
    pool: Arc<PgPool>,
}

impl PgCompanyRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn push_active_filter(builder: &mut QueryBuilder<'_, Postgres>, search: Option<String>) {
    builder.push(" WHERE deleted_at IS NULL AND is_active = TRUE");

    if let Some(term) = search.filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND name ILIKE ")
            .push_bind(format!("%{}%", term.trim()));
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn memberships(&self, user_id: i64) -> Result<Vec<CompanyMembership>, AppError> {
        let memberships = sqlx::query_as::<_, CompanyMembership>(
            r#"
            SELECT c.id AS company_id, c.name AS company_name, c.slug AS company_slug,
                   r.role_type, r.is_primary_contact, r.can_post_jobs,
                   r.can_manage_applications, r.can_manage_billing, r.joined_at
            FROM user_company_roles r
            JOIN companies c ON c.id = r.company_id
            WHERE r.user_id = $1
              AND r.is_active = TRUE
              AND c.is_active = TRUE
              AND c.deleted_at IS NULL
            ORDER BY r.joined_at ASC, r.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(memberships)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        let sql =
            format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1 AND deleted_at IS NULL");

        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(company)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>, AppError> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE slug = $1 AND deleted_at IS NULL"
        );

        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(company)
    }

    async fn list_active(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Company>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COMPANY_COLUMNS} FROM companies"));
        push_active_filter(&mut builder, search);
        builder
            .push(" ORDER BY is_featured DESC, name ASC OFFSET ")
            .push_bind(offset)
            .push(" LIMIT ")
            .push_bind(limit);

        let companies = builder
            .build_query_as::<Company>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(companies)
    }

    async fn count_active(&self, search: Option<String>) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM companies");
        push_active_filter(&mut builder, search);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn update(&self, id: i64, patch: CompanyPatch) -> Result<Company, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE companies SET updated_at = NOW()");

        if let Some(name) = patch.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(industry_id) = patch.industry_id {
            builder.push(", industry_id = ").push_bind(industry_id);
        }
        if let Some(website) = patch.website {
            builder.push(", website = ").push_bind(website);
        }
        if let Some(email) = patch.email {
            builder.push(", email = ").push_bind(email);
        }
        if let Some(phone) = patch.phone {
            builder.push(", phone = ").push_bind(phone);
        }
        if let Some(description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }

        builder
            .push(" WHERE deleted_at IS NULL AND id = ")
            .push_bind(id)
            .push(format!(" RETURNING {COMPANY_COLUMNS}"));

        builder
            .build_query_as::<Company>()
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Company not found", json!({ "id": id })))
    }

    async fn industries(&self) -> Result<Vec<Industry>, AppError> {
        let industries = sqlx::query_as::<_, Industry>(
            r#"
            SELECT id, name, slug
            FROM industries
            WHERE is_active = TRUE
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(industries)
    }

    async fn industry_exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM industries WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn existing_skill_ids(&self, ids: Vec<i64>) -> Result<Vec<i64>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let existing: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM skills WHERE id = ANY($1) ORDER BY id")
                .bind(&ids)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(existing)
    }

    async fn skills(&self) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>("SELECT id, name, slug FROM skills ORDER BY name")
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(skills)
    }
}
