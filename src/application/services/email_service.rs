//! Transactional email: rendering, delivery and delivery logs.

use std::sync::Arc;

use askama::Template;
use tracing::{error, info, warn};
use url::Url;

use crate::domain::entities::{NewEmailLog, User};
use crate::domain::repositories::NotificationLogRepository;
use crate::infrastructure::notify::{Mailer, OutgoingEmail};

/// Who an email goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: Option<i64>,
    pub email: String,
    pub name: String,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            user_id: Some(user.id),
            email: user.email.clone(),
            name: user.first_name.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "emails/verify_email.html")]
struct VerifyEmailHtml<'a> {
    app_name: &'a str,
    name: &'a str,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "emails/verify_email.txt")]
struct VerifyEmailText<'a> {
    app_name: &'a str,
    name: &'a str,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "emails/password_reset.html")]
struct PasswordResetHtml<'a> {
    app_name: &'a str,
    name: &'a str,
    action_url: &'a str,
    expiry_minutes: i64,
}

#[derive(Template)]
#[template(path = "emails/password_reset.txt")]
struct PasswordResetText<'a> {
    app_name: &'a str,
    name: &'a str,
    action_url: &'a str,
    expiry_minutes: i64,
}

#[derive(Template)]
#[template(path = "emails/welcome.html")]
struct WelcomeHtml<'a> {
    app_name: &'a str,
    name: &'a str,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "emails/welcome.txt")]
struct WelcomeText<'a> {
    app_name: &'a str,
    name: &'a str,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "emails/notification.html")]
struct NotificationHtml<'a> {
    app_name: &'a str,
    name: &'a str,
    message: &'a str,
    action_url: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "emails/notification.txt")]
struct NotificationText<'a> {
    app_name: &'a str,
    name: &'a str,
    message: &'a str,
    action_url: Option<&'a str>,
}

/// Sends templated emails and records each attempt in `email_logs`.
///
/// Delivery problems are logged and reported as `false`; they never fail the
/// calling request.
pub struct EmailService<N: NotificationLogRepository> {
    logs: Arc<N>,
    mailer: Arc<dyn Mailer>,
    app_name: String,
    app_url: String,
    reset_expiry_minutes: i64,
}

impl<N: NotificationLogRepository> EmailService<N> {
    pub fn new(
        logs: Arc<N>,
        mailer: Arc<dyn Mailer>,
        app_name: String,
        app_url: String,
        reset_expiry_minutes: i64,
    ) -> Self {
        Self {
            logs,
            mailer,
            app_name,
            app_url,
            reset_expiry_minutes,
        }
    }

    /// Absolute link to a page of the web UI.
    pub fn link(&self, path: &str, params: &[(&str, &str)]) -> String {
        match Url::parse(&self.app_url).and_then(|base| base.join(path)) {
            Ok(mut url) => {
                if !params.is_empty() {
                    url.query_pairs_mut().extend_pairs(params);
                }
                url.to_string()
            }
            Err(e) => {
                warn!(error = %e, app_url = %self.app_url, "Invalid APP_URL, building link by hand");
                format!("{}/{}", self.app_url.trim_end_matches('/'), path)
            }
        }
    }

    pub async fn send_verification_email(&self, user: &User, token: &str) -> bool {
        let recipient = Recipient::from(user);
        let action_url = self.link("verify-email", &[("token", token)]);

        let html = VerifyEmailHtml {
            app_name: &self.app_name,
            name: &recipient.name,
            action_url: &action_url,
        }
        .render();
        let text = VerifyEmailText {
            app_name: &self.app_name,
            name: &recipient.name,
            action_url: &action_url,
        }
        .render();

        let subject = format!("Verify your email address - {}", self.app_name);
        self.deliver(recipient, subject, "verify_email", html, text)
            .await
    }

    pub async fn send_password_reset_email(&self, user: &User, token: &str) -> bool {
        let recipient = Recipient::from(user);
        let action_url = self.link(
            "reset-password",
            &[("token", token), ("email", user.email.as_str())],
        );

        let html = PasswordResetHtml {
            app_name: &self.app_name,
            name: &recipient.name,
            action_url: &action_url,
            expiry_minutes: self.reset_expiry_minutes,
        }
        .render();
        let text = PasswordResetText {
            app_name: &self.app_name,
            name: &recipient.name,
            action_url: &action_url,
            expiry_minutes: self.reset_expiry_minutes,
        }
        .render();

        let subject = format!("Reset your password - {}", self.app_name);
        self.deliver(recipient, subject, "password_reset", html, text)
            .await
    }

    pub async fn send_welcome_email(&self, user: &User) -> bool {
        let recipient = Recipient::from(user);
        let action_url = self.link("dashboard", &[]);

        let html = WelcomeHtml {
            app_name: &self.app_name,
            name: &recipient.name,
            action_url: &action_url,
        }
        .render();
        let text = WelcomeText {
            app_name: &self.app_name,
            name: &recipient.name,
            action_url: &action_url,
        }
        .render();

        let subject = format!("Welcome to {}", self.app_name);
        self.deliver(recipient, subject, "welcome", html, text).await
    }

    /// Free-form notification with an optional call to action.
    pub async fn send_notification_email(
        &self,
        recipient: Recipient,
        subject: &str,
        message: &str,
        action_url: Option<&str>,
    ) -> bool {
        let html = NotificationHtml {
            app_name: &self.app_name,
            name: &recipient.name,
            message,
            action_url,
        }
        .render();
        let text = NotificationText {
            app_name: &self.app_name,
            name: &recipient.name,
            message,
            action_url,
        }
        .render();

        self.deliver(recipient, subject.to_string(), "notification", html, text)
            .await
    }

    async fn deliver(
        &self,
        recipient: Recipient,
        subject: String,
        template: &str,
        html: Result<String, askama::Error>,
        text: Result<String, askama::Error>,
    ) -> bool {
        let log_id = match self
            .logs
            .create_email_log(NewEmailLog {
                user_id: recipient.user_id,
                to_email: recipient.email.clone(),
                subject: subject.clone(),
                template: template.to_string(),
            })
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, template, "Failed to create email log");
                None
            }
        };

        let outcome = match (html, text) {
            (Ok(html_body), Ok(text_body)) => self
                .mailer
                .send(OutgoingEmail {
                    to: recipient.email.clone(),
                    subject,
                    html_body,
                    text_body,
                })
                .await
                .map_err(|e| e.to_string()),
            (Err(e), _) | (_, Err(e)) => Err(format!("template rendering failed: {e}")),
        };

        match outcome {
            Ok(()) => {
                info!(to = %recipient.email, template, "Email sent");
                if let Some(id) = log_id
                    && let Err(e) = self.logs.mark_email_sent(id).await
                {
                    warn!(error = %e, id, "Failed to mark email log as sent");
                }
                true
            }
            Err(reason) => {
                error!(to = %recipient.email, template, error = %reason, "Email delivery failed");
                if let Some(id) = log_id
                    && let Err(e) = self.logs.mark_email_failed(id, &reason).await
                {
                    warn!(error = %e, id, "Failed to mark email log as failed");
                }
                false
            }
        }
    }
}
