//! Shared application state passed to every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    ApplicationService, AuthService, CompanyService, EmailService, JobService, SavedJobService,
    SmsService, SubscriptionService, TokenService, VerificationService,
};
use crate::config::Config;
use crate::domain::analytics_event::AnalyticsEvent;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::notify::{Mailer, SmsGateway};
use crate::infrastructure::persistence::{
    PgApplicationRepository, PgAuthLogRepository, PgCompanyRepository, PgJobRepository,
    PgNotificationLogRepository, PgPasswordResetRepository, PgRevokedTokenRepository,
    PgSavedJobRepository, PgSubscriptionRepository, PgUserRepository,
};

pub type Emails = EmailService<PgNotificationLogRepository>;
pub type Sms = SmsService<PgNotificationLogRepository>;
pub type Auth = AuthService<
    PgUserRepository,
    PgAuthLogRepository,
    PgRevokedTokenRepository,
    PgCompanyRepository,
    PgNotificationLogRepository,
>;
pub type Verifications = VerificationService<
    PgUserRepository,
    PgPasswordResetRepository,
    PgAuthLogRepository,
    PgNotificationLogRepository,
>;
pub type Jobs = JobService<PgJobRepository, PgCompanyRepository, PgSubscriptionRepository>;
pub type SavedJobs = SavedJobService<PgUserRepository, PgJobRepository, PgSavedJobRepository>;
pub type Applications = ApplicationService<
    PgUserRepository,
    PgJobRepository,
    PgApplicationRepository,
    PgCompanyRepository,
    PgNotificationLogRepository,
>;
pub type Companies = CompanyService<PgCompanyRepository, PgJobRepository>;
pub type Subscriptions =
    SubscriptionService<PgSubscriptionRepository, PgCompanyRepository, PgJobRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub app_name: String,
    pub auth_service: Arc<Auth>,
    pub verification_service: Arc<Verifications>,
    pub job_service: Arc<Jobs>,
    pub saved_job_service: Arc<SavedJobs>,
    pub application_service: Arc<Applications>,
    pub company_service: Arc<Companies>,
    pub subscription_service: Arc<Subscriptions>,
    pub sms_service: Arc<Sms>,
    pub cache: Arc<dyn CacheService>,
    pub analytics_tx: mpsc::Sender<AnalyticsEvent>,
    /// Read client IPs from proxy headers.
    pub behind_proxy: bool,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl AppState {
    /// Wires repositories and services over one connection pool.
    pub fn new(
        pool: PgPool,
        config: &Config,
        cache: Arc<dyn CacheService>,
        analytics_tx: mpsc::Sender<AnalyticsEvent>,
        mailer: Arc<dyn Mailer>,
        sms_gateway: Arc<dyn SmsGateway>,
    ) -> Self {
        let shared = Arc::new(pool.clone());
        let users = Arc::new(PgUserRepository::new(shared.clone()));
        let auth_logs = Arc::new(PgAuthLogRepository::new(shared.clone()));
        let revoked = Arc::new(PgRevokedTokenRepository::new(shared.clone()));
        let resets = Arc::new(PgPasswordResetRepository::new(shared.clone()));
        let companies = Arc::new(PgCompanyRepository::new(shared.clone()));
        let jobs = Arc::new(PgJobRepository::new(shared.clone()));
        let saved = Arc::new(PgSavedJobRepository::new(shared.clone()));
        let applications = Arc::new(PgApplicationRepository::new(shared.clone()));
        let subscriptions = Arc::new(PgSubscriptionRepository::new(shared.clone()));
        let notification_logs = Arc::new(PgNotificationLogRepository::new(shared));

        let email_service = Arc::new(Emails::new(
            notification_logs.clone(),
            mailer,
            config.app_name.clone(),
            config.app_url.clone(),
            config.security.password_reset_expiry_minutes,
        ));
        let sms_service = Arc::new(Sms::new(
            notification_logs,
            sms_gateway,
            config.app_name.clone(),
        ));
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_minutes));

        Self {
            db: pool,
            app_name: config.app_name.clone(),
            auth_service: Arc::new(Auth::new(
                users.clone(),
                auth_logs.clone(),
                revoked,
                companies.clone(),
                tokens,
                email_service.clone(),
                config.security.clone(),
            )),
            verification_service: Arc::new(Verifications::new(
                users.clone(),
                resets,
                auth_logs,
                email_service.clone(),
                sms_service.clone(),
                config.security.clone(),
                config.token_signing_secret.clone(),
            )),
            job_service: Arc::new(Jobs::new(
                jobs.clone(),
                companies.clone(),
                subscriptions.clone(),
                cache.clone(),
                analytics_tx.clone(),
                config.cache_ttl_seconds,
            )),
            saved_job_service: Arc::new(SavedJobs::new(users.clone(), jobs.clone(), saved)),
            application_service: Arc::new(Applications::new(
                users,
                jobs.clone(),
                applications,
                companies.clone(),
                email_service,
            )),
            company_service: Arc::new(Companies::new(companies.clone(), jobs.clone())),
            subscription_service: Arc::new(Subscriptions::new(subscriptions, companies, jobs)),
            sms_service,
            cache,
            analytics_tx,
            behind_proxy: config.behind_proxy,
            secure_cookies: config.app_url.starts_with("https://"),
        }
    }
}
