//! Domain layer containing business entities and logic.
//!
//! Entities, repository interfaces and the analytics pipeline, independent of
//! infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`analytics_event`] - Job view and search events
//! - [`analytics_worker`] - Asynchronous analytics processing worker
//!
//! # Analytics Flow
//!
//! 1. A job detail or search handler builds an [`analytics_event::AnalyticsEvent`]
//! 2. The event is queued with [`analytics_event::publish`] (non-blocking)
//! 3. [`analytics_worker::run_analytics_worker`] writes it with retry logic
//! 4. Rows land through [`repositories::AnalyticsRepository`]

pub mod analytics_event;
pub mod analytics_worker;
pub mod entities;
pub mod repositories;
