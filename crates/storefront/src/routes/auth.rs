//! Authentication route handlers.
//!
//! Signup and login forms post here. A failed attempt redirects back to the
//! form with `?error=<code>`; a successful one stores the user in the session
//! and renders a success page that returns home after a short delay.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, UserRecord};
use crate::routes::notice::{Notice, REDIRECT_DELAY_MS, SESSION_ERROR_CODE};
use crate::services::auth::{AuthError, AuthService, SignupInput};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl From<SignupForm> for SignupInput {
    fn from(form: SignupForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
        }
    }
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub notice: Option<Notice>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub current_user: Option<CurrentUser>,
    pub notice: Option<Notice>,
}

/// Shown after a successful signup or login.
#[derive(Template, WebTemplate)]
#[template(path = "auth/success.html")]
pub struct SuccessTemplate {
    pub current_user: Option<CurrentUser>,
    pub notice: Option<Notice>,
    /// Username published to the page for client-side greeting.
    pub username: String,
    pub redirect_to: &'static str,
    pub redirect_delay_secs: u32,
}

/// Logout document.
#[derive(Template, WebTemplate)]
#[template(path = "auth/logout.html")]
pub struct LogoutTemplate {
    pub redirect_to: &'static str,
}

// =============================================================================
// Helpers
// =============================================================================

/// Redirect back to a form page, or fail the request for server faults.
fn form_failure(form_path: &str, err: AuthError) -> Result<Response, AppError> {
    match err.code() {
        Some(code) => Ok(Redirect::to(&format!("{form_path}?error={code}")).into_response()),
        None => Err(err.into()),
    }
}

/// Put `user` in the session and render the success page.
async fn complete_login(
    session: &Session,
    user: UserRecord,
    message: String,
    form_path: &str,
) -> Response {
    let current = CurrentUser {
        username: user.username,
    };
    if let Err(e) = set_current_user(session, &current).await {
        tracing::error!(error = %e, "Failed to set session");
        return Redirect::to(&format!("{form_path}?error={SESSION_ERROR_CODE}")).into_response();
    }
    set_sentry_user(current.username.as_str());

    SuccessTemplate {
        username: current.username.to_string(),
        current_user: Some(current),
        notice: Some(Notice::success(message)),
        redirect_to: "/",
        redirect_delay_secs: REDIRECT_DELAY_MS / 1000,
    }
    .into_response()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        current_user: user,
        notice: Notice::from_error_code(query.error.as_deref()),
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.users());
    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let message = format!("Login successful! Welcome, {}!", user.username);
            Ok(complete_login(&session, user, message, "/auth/login").await)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            form_failure("/auth/login", e)
        }
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    SignupTemplate {
        current_user: user,
        notice: Notice::from_error_code(query.error.as_deref()),
    }
}

/// Handle signup form submission.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(state.users());
    match auth.signup(&SignupInput::from(form)).await {
        Ok(user) => {
            let message = format!("Account created successfully! Welcome, {}!", user.username);
            Ok(complete_login(&session, user, message, "/auth/signup").await)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Signup failed");
            form_failure("/auth/signup", e)
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return a document that clears client-side state.
///
/// Never fails: session store errors are logged and the page is still sent.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!(error = %e, "Failed to destroy session on logout");
    }
    clear_sentry_user();
    tracing::info!("User logged out");

    LogoutTemplate { redirect_to: "/" }
}
