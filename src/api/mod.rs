//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - Extractors that reject with JSON errors
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, role guards, rate limiting and tracing
//! - [`routes`] - Route groups

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
