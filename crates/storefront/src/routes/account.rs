//! Account page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserStore;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, clear_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub current_user: Option<CurrentUser>,
    pub username: String,
    pub email: String,
    pub member_since: String,
}

/// Display the account page.
///
/// A session naming a user the store no longer has is cleared.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let Some(record) = state.users().find_by_username(&user.username).await? else {
        tracing::warn!("Session user missing from store");
        clear_current_user(&session).await?;
        return Ok(Redirect::to("/auth/login").into_response());
    };

    Ok(AccountTemplate {
        current_user: Some(user),
        username: record.username.to_string(),
        email: record.email.to_string(),
        member_since: record.created_at.format("%B %-d, %Y").to_string(),
    }
    .into_response())
}
