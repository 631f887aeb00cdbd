//! Herbal Glow Core - Shared types library.
//!
//! This crate provides the types used across all Herbal Glow components:
//! - `storefront` - Public-facing site with signup, login and the recommender
//! - `cli` - Command-line tools for migrations and store management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for usernames and emails
//! - [`recommendation`] - Skin type / concern selections and the product rule table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod recommendation;
pub mod types;

pub use recommendation::{
    Advice, Concern, Recommendation, RecommendationError, RecommendationTable, SkinType, Tone,
};
pub use types::*;
