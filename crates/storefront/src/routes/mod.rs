//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with the skincare assistant
//! GET  /recommend              - Recommendation (page, or fragment with fragment=true)
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (credential store reachable)
//!
//! # Auth
//! GET  /auth/signup            - Signup page
//! POST /auth/signup            - Signup action
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET|POST /auth/logout        - Logout document
//!
//! # Account (requires auth)
//! GET  /account                - Account overview
//! ```

pub mod account;
pub mod auth;
pub mod health;
pub mod home;
pub mod notice;
pub mod recommend;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/recommend", get(recommend::recommend))
        .route("/account", get(account::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
}
