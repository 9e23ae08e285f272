//! Login, registration and logout pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, RegisterRequest};
use crate::api::extract::Client;
use crate::application::services::{FilterOptions, IssuedToken};
use crate::domain::entities::Industry;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::cookies::{self, SESSION_COOKIE, Toast};
use crate::web::page::{PageContext, error_message, non_blank, redirect_with, render};

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    page: PageContext,
    email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// `GET /login`
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    render(LoginTemplate {
        page: PageContext::new(&state.app_name, &headers, None),
        email: String::new(),
    })
}

/// Signs in from the login form.
///
/// # Endpoint
///
/// `POST /login`
///
/// On success the token is stored in the `auth_token` cookie and the browser
/// is sent to `/dashboard`. Failures re-render the form with a toast and
/// the status the API would have returned.
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    client: Client,
    Form(form): Form<LoginForm>,
) -> Response {
    let request = LoginRequest {
        email: form.email.trim().to_lowercase(),
        password: form.password,
    };

    let result = match request.validate() {
        Ok(()) => {
            state
                .auth_service
                .login(&request.email, &request.password, &client.info)
                .await
        }
        Err(errors) => Err(AppError::from(errors)),
    };

    match result {
        Ok(session) => signed_in(
            &state,
            &session.token,
            Toast::success(format!("Welcome back, {}!", session.user.first_name)),
        ),
        Err(err) => {
            let page = PageContext::new(&state.app_name, &headers, None)
                .with_toast(Toast::error(error_message(&err)));
            (
                err.status(),
                render(LoginTemplate {
                    page,
                    email: request.email,
                }),
            )
                .into_response()
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    page: PageContext,
    form: RegisterForm,
    industries: Vec<Industry>,
}

/// Sign-up form. Every field arrives as text; blank optional fields are absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: String,
    pub company_name: String,
    pub company_website: String,
    pub company_description: String,
    pub industry_id: String,
}

impl RegisterForm {
    fn to_request(&self) -> Result<RegisterRequest, AppError> {
        let industry_id = match non_blank(&self.industry_id) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::invalid_field("industry_id", "The selected industry is invalid.")
            })?),
            None => None,
        };

        Ok(RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(&self.phone),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            role: self.role.clone(),
            company_name: non_blank(&self.company_name),
            company_website: non_blank(&self.company_website),
            company_description: non_blank(&self.company_description),
            industry_id,
        })
    }

    /// The form as it is echoed back after a failure.
    fn without_passwords(mut self) -> Self {
        self.password.clear();
        self.password_confirmation.clear();
        self
    }
}

async fn industries(state: &AppState) -> Vec<Industry> {
    match state.job_service.filter_options().await {
        Ok(FilterOptions { industries, .. }) => industries,
        Err(e) => {
            tracing::warn!(error = %e, "Industries unavailable for the registration form");
            Vec::new()
        }
    }
}

/// `GET /register`
pub async fn register_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    render(RegisterTemplate {
        page: PageContext::new(&state.app_name, &headers, None),
        form: RegisterForm {
            role: "job-seeker".to_string(),
            ..RegisterForm::default()
        },
        industries: industries(&state).await,
    })
}

/// Creates an account from the sign-up form.
///
/// # Endpoint
///
/// `POST /register`
///
/// Runs the same validation as `POST /api/auth/register`, then signs the new
/// user in and redirects to `/dashboard`.
pub async fn register_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    client: Client,
    Form(form): Form<RegisterForm>,
) -> Response {
    let result = async {
        let request = form.to_request()?;
        request.validate()?;
        state
            .auth_service
            .register(request.into_input()?, &client.info)
            .await
    }
    .await;

    match result {
        Ok(session) => signed_in(
            &state,
            &session.token,
            Toast::success("Account created. Check your inbox to verify your email address."),
        ),
        Err(err) => {
            let page = PageContext::new(&state.app_name, &headers, None)
                .with_toast(Toast::error(error_message(&err)));
            (
                err.status(),
                render(RegisterTemplate {
                    page,
                    form: form.without_passwords(),
                    industries: industries(&state).await,
                }),
            )
                .into_response()
        }
    }
}

/// Signs the browser out.
///
/// # Endpoint
///
/// `GET /logout` or `POST /logout`
///
/// Revokes the token when it is still valid, then clears the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap, client: Client) -> Response {
    if let Some(token) = cookies::get(&headers, SESSION_COOKIE)
        && let Ok((user, claims)) = state.auth_service.authenticate(&token).await
        && let Err(e) = state
            .auth_service
            .logout(&user, &claims, &client.info)
            .await
    {
        tracing::warn!(error = %e, user_id = user.id, "Failed to revoke session on logout");
    }

    let mut headers = vec![(SET_COOKIE, cookies::clear_session())];
    if let Some(flash) = cookies::flash(
        &Toast::success("You have been logged out."),
        state.secure_cookies,
    ) {
        headers.push((SET_COOKIE, flash));
    }
    (AppendHeaders(headers), Redirect::to("/login")).into_response()
}

fn signed_in(state: &AppState, token: &IssuedToken, toast: Toast) -> Response {
    let Some(session) = cookies::session(&token.token, token.expires_in, state.secure_cookies)
    else {
        return redirect_with(
            "/login",
            Toast::error("Could not start a session. Please try again."),
            state.secure_cookies,
        );
    };

    let mut headers = vec![(SET_COOKIE, session)];
    if let Some(flash) = cookies::flash(&toast, state.secure_cookies) {
        headers.push((SET_COOKIE, flash));
    }
    (AppendHeaders(headers), Redirect::to("/dashboard")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            first_name: " Amina ".into(),
            last_name: "Otieno".into(),
            email: "amina@example.com".into(),
            password: "secret123".into(),
            password_confirmation: "secret123".into(),
            role: "job-seeker".into(),
            ..RegisterForm::default()
        }
    }

    #[test]
    fn test_blank_optional_fields_are_absent() {
        let request = form().to_request().unwrap();
        assert_eq!(request.first_name, "Amina");
        assert_eq!(request.phone, None);
        assert_eq!(request.company_website, None);
        assert_eq!(request.industry_id, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_bad_industry_is_a_field_error() {
        let err = RegisterForm {
            industry_id: "tech".into(),
            ..form()
        }
        .to_request()
        .unwrap_err();
        assert_eq!(err.field_messages()[0].0, "industry_id");
    }

    #[test]
    fn test_echoed_form_drops_passwords() {
        let echoed = form().without_passwords();
        assert!(echoed.password.is_empty());
        assert!(echoed.password_confirmation.is_empty());
        assert_eq!(echoed.email, "amina@example.com");
    }
}
