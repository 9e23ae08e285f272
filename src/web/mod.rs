//! Server-rendered pages for browsers.
//!
//! The same account and job search flows as the API, rendered with Askama.
//! The session is the JWT kept in an `HttpOnly` cookie.
//!
//! # Modules
//!
//! - [`cookies`] - Session and flash cookies
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie authentication
//! - [`page`] - Layout context and redirects
//! - [`routes`] - Page route configuration

pub mod cookies;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod routes;
