//! Cookie-based authentication middleware for the HTML pages.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::SET_COOKIE},
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};

use crate::api::middleware::AuthUser;
use crate::domain::entities::User;
use crate::state::AppState;
use crate::web::cookies::{self, SESSION_COOKIE, Toast};

/// Authenticates page requests using the session cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: auth_token=<jwt>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract the `auth_token` cookie from the request
/// 2. Resolve it through [`crate::application::services::AuthService::authenticate`]
/// 3. On success, attach [`AuthUser`] and continue to the handler
/// 4. On failure or missing cookie, clear it and redirect to `/login`
///
/// # Differences from API Auth
///
/// Unlike the API auth middleware which returns `401 Unauthorized`,
/// this middleware redirects to the login page for a better user experience
/// in a browser context.
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = cookies::get(req.headers(), SESSION_COOKIE) else {
        return to_login(&st, Toast::info("Please log in to continue."));
    };

    match st.auth_service.authenticate(&token).await {
        Ok((user, claims)) => {
            req.extensions_mut().insert(AuthUser { user, claims });
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected page session");
            to_login(&st, Toast::warning("Your session has expired. Please log in again."))
        }
    }
}

fn to_login(st: &AppState, toast: Toast) -> Response {
    let mut headers = vec![(SET_COOKIE, cookies::clear_session())];
    if let Some(flash) = cookies::flash(&toast, st.secure_cookies) {
        headers.push((SET_COOKIE, flash));
    }
    (AppendHeaders(headers), Redirect::to("/login")).into_response()
}

/// The signed-in user on public pages, if the session cookie is valid.
pub async fn current_user(st: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = cookies::get(headers, SESSION_COOKIE)?;
    st.auth_service
        .authenticate(&token)
        .await
        .ok()
        .map(|(user, _)| user)
}
