//! Authentication: login with lockout, registration and JWT sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::email_service::EmailService;
use super::token_service::{Claims, IssuedToken, TokenService};
use crate::config::SecuritySettings;
use crate::domain::entities::user::lock_expiry;
use crate::domain::entities::{
    AuthAction, ClientInfo, CompanyMembership, FailedLogin, JobSeeker, LockRemaining, LockState,
    NewAuthLog, NewCompanyProfile, NewUser, User, UserRole,
};
use crate::domain::repositories::{
    AuthLogRepository, CompanyRepository, NotificationLogRepository, RevokedTokenRepository,
    UserRepository,
};
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::secrets::generate_token;
use crate::utils::slug::slugify;

/// Company details supplied by an employer at sign-up.
#[derive(Debug, Clone)]
pub struct CompanyInput {
    pub name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub industry_id: Option<i64>,
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: UserRole,
    pub company: Option<CompanyInput>,
}

/// A signed-in user and their token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: IssuedToken,
}

/// The current user with the profile records attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub job_seeker: Option<JobSeeker>,
    pub companies: Vec<CompanyMembership>,
}

pub struct AuthService<U, L, R, C, N>
where
    U: UserRepository,
    L: AuthLogRepository,
    R: RevokedTokenRepository,
    C: CompanyRepository,
    N: NotificationLogRepository,
{
    users: Arc<U>,
    auth_logs: Arc<L>,
    revoked: Arc<R>,
    companies: Arc<C>,
    tokens: Arc<TokenService>,
    email: Arc<EmailService<N>>,
    security: SecuritySettings,
}

impl<U, L, R, C, N> AuthService<U, L, R, C, N>
where
    U: UserRepository,
    L: AuthLogRepository,
    R: RevokedTokenRepository,
    C: CompanyRepository,
    N: NotificationLogRepository,
{
    pub fn new(
        users: Arc<U>,
        auth_logs: Arc<L>,
        revoked: Arc<R>,
        companies: Arc<C>,
        tokens: Arc<TokenService>,
        email: Arc<EmailService<N>>,
        security: SecuritySettings,
    ) -> Self {
        Self {
            users,
            auth_logs,
            revoked,
            companies,
            tokens,
            email,
            security,
        }
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.tokens.ttl_seconds()
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for unknown emails, inactive accounts and
    ///   wrong passwords. The wrong-password error reports the attempts left,
    ///   or the lock when this attempt triggered one.
    /// - [`AppError::Locked`] while the account is locked.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> Result<AuthSession, AppError> {
        let now = Utc::now();

        let Some(mut user) = self.users.find_by_email(email).await? else {
            self.audit(NewAuthLog::failure(
                AuthAction::Login,
                None,
                email,
                client,
                "User not found",
            ))
            .await;
            return Err(AppError::unauthorized("Invalid credentials", json!({})));
        };

        if !user.is_active {
            self.audit(NewAuthLog::failure(
                AuthAction::Login,
                Some(user.id),
                email,
                client,
                "Account deactivated",
            ))
            .await;
            return Err(AppError::unauthorized(
                "Account is deactivated. Please contact support.",
                json!({}),
            ));
        }

        if self.is_account_locked(&user, now).await? {
            self.audit(NewAuthLog::failure(
                AuthAction::Login,
                Some(user.id),
                email,
                client,
                "Account locked",
            ))
            .await;
            return Err(locked_error(user.locked_until.unwrap_or(now), now));
        }

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            let failed = self.increment_failed_attempts(&user, now).await?;
            self.audit(NewAuthLog::failure(
                AuthAction::Login,
                Some(user.id),
                email,
                client,
                "Invalid password",
            ))
            .await;
            return Err(self.wrong_password_error(failed, now));
        }

        self.users.record_successful_login(user.id).await?;
        user.failed_login_attempts = 0;
        user.locked_until = None;
        user.last_login_at = Some(now);

        let token = self.tokens.issue_at(&user, now)?;
        self.audit(NewAuthLog::success(
            AuthAction::Login,
            user.id,
            &user.email,
            client,
        ))
        .await;
        info!(user_id = user.id, "User logged in");

        Ok(AuthSession { user, token })
    }

    /// Creates an account and signs it in.
    ///
    /// Field-level conflicts (email, phone, industry) are reported as
    /// validation errors. A failed insert rolls back completely.
    pub async fn register(
        &self,
        input: RegisterInput,
        client: &ClientInfo,
    ) -> Result<AuthSession, AppError> {
        if !input.role.is_self_service() {
            return Err(AppError::invalid_field("role", "The selected role is invalid."));
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::invalid_field(
                "email",
                "The email has already been taken.",
            ));
        }

        if let Some(phone) = input.phone.as_deref()
            && self.users.find_by_phone(phone).await?.is_some()
        {
            return Err(AppError::invalid_field(
                "phone",
                "The phone has already been taken.",
            ));
        }

        let company = match (input.role, input.company) {
            (UserRole::Employer, Some(company)) => {
                if let Some(industry_id) = company.industry_id
                    && !self.companies.industry_exists(industry_id).await?
                {
                    return Err(AppError::invalid_field(
                        "industry_id",
                        "The selected industry is invalid.",
                    ));
                }
                Some(NewCompanyProfile {
                    slug: slugify(&company.name),
                    name: company.name,
                    website: company.website,
                    description: company.description,
                    industry_id: company.industry_id,
                })
            }
            (UserRole::Employer, None) => {
                return Err(AppError::invalid_field(
                    "company_name",
                    "The company name field is required when role is employer.",
                ));
            }
            _ => None,
        };

        let password_hash = hash_password(input.password).await?;
        let verification_token = generate_token()?;

        let new_user = NewUser {
            uuid: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            password_hash,
            role: input.role,
            email_verification_token: verification_token.clone(),
            company,
        };

        let user = match self.users.create(new_user).await {
            Ok(user) => user,
            Err(e @ (AppError::Validation { .. } | AppError::Conflict { .. })) => return Err(e),
            Err(e) => {
                error!(error = %e, "Registration failed");
                return Err(AppError::internal(
                    "Registration failed. Please try again.",
                    json!({}),
                ));
            }
        };

        if !self
            .email
            .send_verification_email(&user, &verification_token)
            .await
        {
            warn!(user_id = user.id, "Verification email was not delivered");
        }

        let token = self.tokens.issue(&user)?;
        self.audit(NewAuthLog::success(
            AuthAction::Register,
            user.id,
            &user.email,
            client,
        ))
        .await;
        info!(user_id = user.id, role = %user.role, "User registered");

        Ok(AuthSession { user, token })
    }

    pub async fn me(&self, user: User) -> Result<UserProfile, AppError> {
        let job_seeker = match user.role {
            UserRole::JobSeeker => self.users.find_job_seeker(user.id).await?,
            _ => None,
        };
        let companies = self.companies.memberships(user.id).await?;

        Ok(UserProfile {
            user,
            job_seeker,
            companies,
        })
    }

    /// Revokes the presented token until it would have expired anyway.
    pub async fn logout(
        &self,
        user: &User,
        claims: &Claims,
        client: &ClientInfo,
    ) -> Result<(), AppError> {
        self.revoked
            .revoke(claims.jti, user.id, claims.expires_at())
            .await?;
        self.audit(NewAuthLog::success(
            AuthAction::Logout,
            user.id,
            &user.email,
            client,
        ))
        .await;
        Ok(())
    }

    /// Swaps the presented token for a fresh one.
    pub async fn refresh(
        &self,
        user: User,
        claims: &Claims,
        client: &ClientInfo,
    ) -> Result<AuthSession, AppError> {
        self.revoked
            .revoke(claims.jti, user.id, claims.expires_at())
            .await?;
        let token = self.tokens.issue(&user)?;
        self.audit(NewAuthLog::success(
            AuthAction::Refresh,
            user.id,
            &user.email,
            client,
        ))
        .await;
        Ok(AuthSession { user, token })
    }

    /// Resolves a bearer token to its active user.
    ///
    /// # Errors
    ///
    /// - `401 TOKEN_EXPIRED` / `401 TOKEN_INVALID` for bad or revoked tokens
    /// - `404 USER_NOT_FOUND` when the subject no longer exists
    /// - `403 ACCOUNT_INACTIVE` when the account is deactivated
    pub async fn authenticate(&self, token: &str) -> Result<(User, Claims), AppError> {
        let claims = self.tokens.decode(token)?;

        if self.revoked.is_revoked(claims.jti).await? {
            return Err(
                AppError::unauthorized("Token has been revoked", json!({}))
                    .with_code("TOKEN_INVALID"),
            );
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::not_found("User not found", json!({})).with_code("USER_NOT_FOUND")
            })?;

        if !user.is_active {
            return Err(
                AppError::forbidden("Account is deactivated", json!({}))
                    .with_code("ACCOUNT_INACTIVE"),
            );
        }

        Ok((user, claims))
    }

    /// Whether the account is locked at `now`. An expired lock is cleared.
    pub async fn is_account_locked(&self, user: &User, now: DateTime<Utc>) -> Result<bool, AppError> {
        match user.lock_state(now) {
            LockState::Locked { .. } => Ok(true),
            LockState::Expired => {
                self.unlock_account(user.id).await?;
                info!(user_id = user.id, "Expired account lock cleared");
                Ok(false)
            }
            LockState::Unlocked => Ok(false),
        }
    }

    pub async fn increment_failed_attempts(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<FailedLogin, AppError> {
        let failed = self
            .users
            .record_failed_login(
                user.id,
                self.security.max_login_attempts,
                lock_expiry(now, self.security.lockout_duration_secs),
            )
            .await?;

        if failed.is_locked(now) {
            warn!(user_id = user.id, "Account locked after repeated failed logins");
        }
        Ok(failed)
    }

    pub async fn lock_account(&self, user_id: i64, now: DateTime<Utc>) -> Result<(), AppError> {
        self.users
            .set_lock(user_id, lock_expiry(now, self.security.lockout_duration_secs))
            .await
    }

    pub async fn unlock_account(&self, user_id: i64) -> Result<(), AppError> {
        self.users.clear_lock(user_id).await
    }

    pub async fn reset_failed_attempts(&self, user_id: i64) -> Result<(), AppError> {
        self.users.reset_failed_attempts(user_id).await
    }

    fn wrong_password_error(&self, failed: FailedLogin, now: DateTime<Utc>) -> AppError {
        match failed.locked_until {
            Some(until) if until > now => {
                let remaining = LockRemaining::new(until, now);
                AppError::unauthorized(
                    format!(
                        "Account locked due to too many failed login attempts. Please try again in {} minutes.",
                        remaining.remaining_minutes
                    ),
                    json!(remaining),
                )
            }
            _ => AppError::unauthorized(
                "Invalid credentials",
                json!({
                    "remaining_attempts": (self.security.max_login_attempts - failed.attempts).max(0)
                }),
            ),
        }
    }

    async fn audit(&self, entry: NewAuthLog) {
        if let Err(e) = self.auth_logs.record(entry).await {
            warn!(error = %e, "Failed to write authentication log");
        }
    }
}

fn locked_error(until: DateTime<Utc>, now: DateTime<Utc>) -> AppError {
    let remaining = LockRemaining::new(until, now);
    AppError::locked(
        format!(
            "Account is temporarily locked due to too many failed login attempts. Please try again in {} minutes.",
            remaining.remaining_minutes
        ),
        json!(remaining),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::fixtures::user;
    use crate::domain::repositories::{
        MockAuthLogRepository, MockCompanyRepository, MockNotificationLogRepository,
        MockRevokedTokenRepository, MockUserRepository,
    };
    use crate::infrastructure::notify::MockMailer;
    use crate::utils::password::hash_password_blocking;
    use chrono::Duration;

    type TestAuthService = AuthService<
        MockUserRepository,
        MockAuthLogRepository,
        MockRevokedTokenRepository,
        MockCompanyRepository,
        MockNotificationLogRepository,
    >;

    struct Mocks {
        users: MockUserRepository,
        revoked: MockRevokedTokenRepository,
        companies: MockCompanyRepository,
        mailer: MockMailer,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                revoked: MockRevokedTokenRepository::new(),
                companies: MockCompanyRepository::new(),
                mailer: MockMailer::new(),
            }
        }

        fn build(self) -> TestAuthService {
            let mut logs = MockAuthLogRepository::new();
            logs.expect_record().returning(|_| Ok(()));

            let mut notification_logs = MockNotificationLogRepository::new();
            notification_logs.expect_create_email_log().returning(|_| Ok(1));
            notification_logs.expect_mark_email_sent().returning(|_| Ok(()));
            notification_logs
                .expect_mark_email_failed()
                .returning(|_, _| Ok(()));

            let email = EmailService::new(
                Arc::new(notification_logs),
                Arc::new(self.mailer),
                "HR Talent".to_string(),
                "http://localhost:3000".to_string(),
                60,
            );

            AuthService::new(
                Arc::new(self.users),
                Arc::new(logs),
                Arc::new(self.revoked),
                Arc::new(self.companies),
                Arc::new(TokenService::new("test-jwt-secret", 60)),
                Arc::new(email),
                SecuritySettings::default(),
            )
        }
    }

    fn user_with_password(id: i64, password: &str) -> User {
        User {
            password_hash: hash_password_blocking(password).unwrap(),
            ..user(id)
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));

        let err = mocks
            .build()
            .login("nobody@example.com", "secret123", &ClientInfo::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { ref message, .. } if message == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_success_resets_counter() {
        let mut mocks = Mocks::new();
        let stored = user_with_password(1, "secret123");
        mocks
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        mocks
            .users
            .expect_record_successful_login()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let session = mocks
            .build()
            .login("user1@example.com", "secret123", &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(session.user.id, 1);
        assert_eq!(session.token.claims.sub, 1);
        assert_eq!(session.token.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_wrong_password_reports_remaining_attempts() {
        let mut mocks = Mocks::new();
        let stored = user_with_password(1, "secret123");
        mocks
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        mocks
            .users
            .expect_record_failed_login()
            .withf(|id, max, _| *id == 1 && *max == 5)
            .times(1)
            .returning(|_, _, _| {
                Ok(FailedLogin {
                    attempts: 2,
                    locked_until: None,
                })
            });

        let err = mocks
            .build()
            .login("user1@example.com", "wrong-password", &ClientInfo::default())
            .await
            .unwrap_err();

        let info = err.info();
        assert_eq!(info.message, "Invalid credentials");
        assert_eq!(info.details["remaining_attempts"], 3);
    }

    #[tokio::test]
    async fn test_fifth_failure_locks_account() {
        let mut mocks = Mocks::new();
        let stored = user_with_password(1, "secret123");
        mocks
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        mocks
            .users
            .expect_record_failed_login()
            .returning(|_, _, until| {
                Ok(FailedLogin {
                    attempts: 0,
                    locked_until: Some(until),
                })
            });

        let err = mocks
            .build()
            .login("user1@example.com", "wrong-password", &ClientInfo::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
        let info = err.info();
        assert!(info.message.starts_with("Account locked due to too many failed login attempts"));
        assert_eq!(info.details["remaining_minutes"], 15);
    }

    #[tokio::test]
    async fn test_locked_account_returns_423() {
        let mut mocks = Mocks::new();
        let mut stored = user_with_password(1, "secret123");
        stored.locked_until = Some(Utc::now() + Duration::minutes(10));
        mocks
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let err = mocks
            .build()
            .login("user1@example.com", "secret123", &ClientInfo::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Locked { code: "ACCOUNT_LOCKED", .. }));
        assert!(err.info().details["remaining_seconds"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_expired_lock_is_cleared_before_login() {
        let mut mocks = Mocks::new();
        let mut stored = user_with_password(1, "secret123");
        stored.locked_until = Some(Utc::now() - Duration::minutes(1));
        mocks
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        mocks
            .users
            .expect_clear_lock()
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .users
            .expect_record_successful_login()
            .returning(|_| Ok(()));

        let session = mocks
            .build()
            .login("user1@example.com", "secret123", &ClientInfo::default())
            .await
            .unwrap();
        assert!(session.user.locked_until.is_none());
    }

    #[tokio::test]
    async fn test_inactive_account_rejected() {
        let mut mocks = Mocks::new();
        let mut stored = user_with_password(1, "secret123");
        stored.is_active = false;
        mocks
            .users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let err = mocks
            .build()
            .login("user1@example.com", "secret123", &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.info().message,
            "Account is deactivated. Please contact support."
        );
    }

    fn register_input(role: UserRole) -> RegisterInput {
        RegisterInput {
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            email: "amina@example.com".to_string(),
            phone: None,
            password: "password123".to_string(),
            role,
            company: None,
        }
    }

    #[tokio::test]
    async fn test_register_sends_verification_email() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks
            .users
            .expect_create()
            .withf(|new_user| {
                new_user.email_verification_token.len() == 64
                    && new_user.company.is_none()
                    && new_user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    email: new_user.email,
                    ..user(9)
                })
            });
        mocks.mailer.expect_send().times(1).returning(|_| Ok(()));

        let session = mocks
            .build()
            .register(register_input(UserRole::JobSeeker), &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(session.user.id, 9);
        assert_eq!(session.token.claims.role, UserRole::JobSeeker);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(1))));

        let err = mocks
            .build()
            .register(register_input(UserRole::JobSeeker), &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.field_messages(),
            vec![(
                "email".to_string(),
                "The email has already been taken.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_register_employer_requires_company() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));

        let err = mocks
            .build()
            .register(register_input(UserRole::Employer), &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(err.field_messages()[0].0, "company_name");
    }

    #[tokio::test]
    async fn test_register_keeps_field_of_insert_conflict() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks.users.expect_create().returning(|_| {
            Err(AppError::invalid_field(
                "phone",
                "The phone has already been taken.",
            ))
        });

        let err = mocks
            .build()
            .register(register_input(UserRole::JobSeeker), &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.field_messages(),
            vec![(
                "phone".to_string(),
                "The phone has already been taken.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_register_failure_is_generic() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks
            .users
            .expect_create()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let err = mocks
            .build()
            .register(register_input(UserRole::JobSeeker), &ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(err.info().message, "Registration failed. Please try again.");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_revoked_token() {
        let mut mocks = Mocks::new();
        mocks.revoked.expect_is_revoked().returning(|_| Ok(true));
        let service = mocks.build();

        let issued = service.tokens.issue(&user(1)).unwrap();
        let err = service.authenticate(&issued.token).await.unwrap_err();
        assert_eq!(err.info().code, "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn test_authenticate_inactive_user() {
        let mut mocks = Mocks::new();
        mocks.revoked.expect_is_revoked().returning(|_| Ok(false));
        mocks.users.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                is_active: false,
                ..user(id)
            }))
        });
        let service = mocks.build();

        let issued = service.tokens.issue(&user(1)).unwrap();
        let err = service.authenticate(&issued.token).await.unwrap_err();
        assert_eq!(err.info().code, "ACCOUNT_INACTIVE");
    }

    #[tokio::test]
    async fn test_logout_revokes_jti() {
        let mut mocks = Mocks::new();
        let service_tokens = TokenService::new("test-jwt-secret", 60);
        let issued = service_tokens.issue(&user(1)).unwrap();
        let jti = issued.claims.jti;
        mocks
            .revoked
            .expect_revoke()
            .withf(move |id, user_id, _| *id == jti && *user_id == 1)
            .times(1)
            .returning(|_, _, _| Ok(()));

        mocks
            .build()
            .logout(&user(1), &issued.claims, &ClientInfo::default())
            .await
            .unwrap();
    }
}
