//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Signup and login against the configured credential store

pub mod auth;
