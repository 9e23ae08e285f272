//! Shared page plumbing: layout context, toast hand-off and redirects.

use axum::{
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};

use crate::domain::entities::User;
use crate::error::AppError;
use crate::web::cookies::{self, Toast};

/// Values every page layout needs.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub app_name: String,
    pub toast: Option<Toast>,
    pub user_name: Option<String>,
}

impl PageContext {
    /// Builds the context, consuming any pending flash toast.
    pub fn new(app_name: &str, headers: &HeaderMap, user: Option<&User>) -> Self {
        Self {
            app_name: app_name.to_string(),
            toast: cookies::read_flash(headers),
            user_name: user.map(User::full_name),
        }
    }

    /// Replaces the flash toast with one produced by this request.
    pub fn with_toast(mut self, toast: Toast) -> Self {
        self.toast = Some(toast);
        self
    }
}

/// Renders a page and drops the flash cookie it may have shown.
pub fn render(page: impl IntoResponse) -> Response {
    (AppendHeaders([(SET_COOKIE, cookies::clear_flash())]), page).into_response()
}

/// Redirects to `to`, carrying `toast` to the next page.
pub fn redirect_with(to: &str, toast: Toast, secure: bool) -> Response {
    match cookies::flash(&toast, secure) {
        Some(flash) => (AppendHeaders([(SET_COOKIE, flash)]), Redirect::to(to)).into_response(),
        None => Redirect::to(to).into_response(),
    }
}

/// One line describing `err` for a toast. Field errors win over the summary.
pub fn error_message(err: &AppError) -> String {
    err.field_messages()
        .into_iter()
        .next()
        .map(|(_, message)| message)
        .unwrap_or_else(|| err.info().message)
}

/// Trims a form field and maps blank input to `None`.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
