//! HTTP middleware for request processing and protection.
//!
//! Provides authentication, role guards, rate limiting and observability.

pub mod auth;
pub mod rate_limit;
pub mod tracing;

pub use auth::AuthUser;
