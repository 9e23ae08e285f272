//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, caching and notification
//! delivery.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`notify`] - SMTP mailer and SMS gateways
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod notify;
pub mod persistence;
