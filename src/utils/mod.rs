//! Utility functions shared across layers.
//!
//! - [`password`] - Argon2id password hashing
//! - [`secrets`] - Random tokens, OTPs and HMAC digests
//! - [`slug`] - Slug generation for companies and postings

pub mod password;
pub mod secrets;
pub mod slug;
