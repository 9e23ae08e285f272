//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{Connection, PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::user::INITIAL_PROFILE_COMPLETION;
use crate::domain::entities::{FailedLogin, JobSeeker, NewCompanyProfile, NewUser, User, UserRole};
use crate::domain::repositories::UserRepository;
use crate::error::{AppError, map_sqlx_error};
use crate::utils::slug::unique_slug;

const USER_COLUMNS: &str = r#"
    id, uuid, first_name, last_name, email, phone, password_hash, role, is_active,
    email_notifications, sms_notifications, email_verified_at, email_verification_token,
    phone_verified_at, phone_verification_code, phone_verification_expires_at,
    failed_login_attempts, locked_until, last_login_at, created_at, updated_at
"#;

/// PostgreSQL repository for user accounts.
///
/// Registration writes the user and its profile (job seeker row, or company
/// plus owner membership) in one transaction.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_where(&self, predicate: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {predicate} AND deleted_at IS NULL"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }
}

/// Attempts at a free company slug before giving up.
const SLUG_ATTEMPTS: usize = 5;

/// Maps a unique violation on `users` to the registration field it belongs to.
fn registration_conflict(e: sqlx::Error) -> AppError {
    let field = match e
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
    {
        Some("users_email_key") => Some("email"),
        Some("users_phone_key") => Some("phone"),
        _ => None,
    };

    match field {
        Some(field) => {
            AppError::invalid_field(field, format!("The {field} has already been taken."))
        }
        None => map_sqlx_error(e),
    }
}

fn is_slug_collision(e: &sqlx::Error) -> bool {
    e.as_database_error().is_some_and(|db| {
        db.is_unique_violation() && db.constraint() == Some("companies_slug_key")
    })
}

/// Inserts a company with a free slug and makes `user_id` its owner.
///
/// Each insert runs under a savepoint; a slug claimed by a concurrent
/// registration rolls back to it and the next free slug is tried.
async fn insert_owned_company(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    company: &NewCompanyProfile,
) -> Result<(), AppError> {
    let mut company_id = None;

    for attempt in 1..=SLUG_ATTEMPTS {
        let taken: Vec<String> = sqlx::query_scalar(
            "SELECT slug FROM companies WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&company.slug)
        .fetch_all(&mut **tx)
        .await?;

        let slug = unique_slug(&company.slug, &taken);

        let mut savepoint = Connection::begin(&mut **tx).await?;
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO companies (uuid, name, slug, industry_id, website, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(&company.name)
        .bind(&slug)
        .bind(company.industry_id)
        .bind(&company.website)
        .bind(&company.description)
        .fetch_one(&mut *savepoint)
        .await;

        match inserted {
            Ok(id) => {
                savepoint.commit().await?;
                company_id = Some(id);
                break;
            }
            Err(e) if is_slug_collision(&e) => {
                savepoint.rollback().await?;
                debug!(slug = %slug, attempt, "Company slug taken concurrently, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let company_id = company_id.ok_or_else(|| {
        AppError::conflict(
            "Could not allocate a company slug",
            json!({ "slug": company.slug }),
        )
    })?;

    sqlx::query(
        r#"
        INSERT INTO user_company_roles (
            user_id, company_id, role_type, is_primary_contact,
            can_post_jobs, can_manage_applications, can_manage_billing
        )
        VALUES ($1, $2, 'owner', TRUE, TRUE, TRUE, TRUE)
        "#,
    )
    .bind(user_id)
    .bind(company_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_where("LOWER(email) = LOWER($1)", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, AppError> {
        self.find_where("phone = $1", phone).await
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AppError> {
        self.find_where("email_verification_token = $1", token).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO users (
                uuid, first_name, last_name, email, phone, password_hash, role,
                email_verification_token
            )
            VALUES ($1, $2, $3, LOWER($4), $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new_user.uuid)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.email)
            .bind(&new_user.phone)
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .bind(&new_user.email_verification_token)
            .fetch_one(&mut *tx)
            .await
            .map_err(registration_conflict)?;

        match &new_user.company {
            Some(company) => insert_owned_company(&mut tx, user.id, company).await?,
            None if new_user.role == UserRole::JobSeeker => {
                sqlx::query(
                    "INSERT INTO job_seekers (user_id, profile_completion_percentage) VALUES ($1, $2)",
                )
                .bind(user.id)
                .bind(INITIAL_PROFILE_COMPLETION)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        tx.commit().await?;

        Ok(user)
    }

    async fn record_failed_login(
        &self,
        id: i64,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
    ) -> Result<FailedLogin, AppError> {
        // The counter resets to zero when the lock is applied.
        let (attempts, locked_until): (i32, Option<DateTime<Utc>>) = sqlx::query_as(
            r#"
            UPDATE users
            SET failed_login_attempts = CASE
                    WHEN failed_login_attempts + 1 >= $2 THEN 0
                    ELSE failed_login_attempts + 1
                END,
                locked_until = CASE
                    WHEN failed_login_attempts + 1 >= $2 THEN $3
                    ELSE locked_until
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING failed_login_attempts, locked_until
            "#,
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(FailedLogin {
            attempts,
            locked_until,
        })
    }

    async fn set_lock(&self, id: i64, until: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET locked_until = $2, failed_login_attempts = 0, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(until)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn reset_failed_attempts(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET failed_login_attempts = 0, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn clear_lock(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET locked_until = NULL, failed_login_attempts = 0, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn record_successful_login(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET failed_login_attempts = 0, last_login_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn mark_email_verified(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET email_verified_at = NOW(), email_verification_token = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn store_phone_otp(
        &self,
        id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET phone_verification_code = $2,
                phone_verification_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn mark_phone_verified(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET phone_verified_at = NOW(),
                phone_verification_code = NULL,
                phone_verification_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                failed_login_attempts = 0,
                locked_until = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn find_job_seeker(&self, user_id: i64) -> Result<Option<JobSeeker>, AppError> {
        let seeker = sqlx::query_as::<_, JobSeeker>(
            r#"
            SELECT id, user_id, bio, current_job_title, years_of_experience, current_location,
                   resume_url, is_available, profile_completion_percentage, created_at, updated_at
            FROM job_seekers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(seeker)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            OFFSET $1
            LIMIT $2
            "#
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }
}
