//! Core types for Herbal Glow.
//!
//! This module provides type-safe wrappers for user identity fields.

pub mod email;
pub mod username;

pub use email::{Email, EmailError};
pub use username::{Username, UsernameError};
