//! Skincare recommendation route.
//!
//! `GET /recommend?skin_type=..&concern=..` renders the result. The popup
//! script asks for just the fragment with `fragment=true` (any value other
//! than empty, `false` or `0` counts); a plain form submit gets the full home
//! page with the popup open.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use herbal_glow_core::{Concern, SkinType};

use crate::error::add_breadcrumb;
use crate::middleware::OptionalAuth;
use crate::routes::home::{
    AdviceView, HomeTemplate, RecommendationFragment, concern_options, skin_type_options,
};
use crate::state::AppState;

/// Query parameters for a recommendation.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub skin_type: String,
    #[serde(default)]
    pub concern: String,
    /// Return only the result fragment.
    #[serde(default)]
    pub fragment: Option<String>,
}

impl RecommendQuery {
    /// Whether the caller asked for the fragment alone.
    #[must_use]
    pub fn wants_fragment(&self) -> bool {
        self.fragment
            .as_deref()
            .map(str::trim)
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "0")
    }
}

/// Recommend a product for the selected skin type and concern.
#[instrument(skip(state, user), fields(skin_type = %query.skin_type, concern = %query.concern))]
pub async fn recommend(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<RecommendQuery>,
) -> Response {
    let advice = state
        .recommendations()
        .recommend(&query.skin_type, &query.concern);
    tracing::debug!(?advice, "Recommendation computed");
    add_breadcrumb(
        "recommendation",
        "Requested recommendation",
        &[("skin_type", &query.skin_type), ("concern", &query.concern)],
    );

    let advice = AdviceView::from(advice);
    if query.wants_fragment() {
        return RecommendationFragment { advice }.into_response();
    }

    HomeTemplate {
        current_user: user,
        skin_types: skin_type_options(query.skin_type.parse::<SkinType>().ok()),
        concerns: concern_options(query.concern.parse::<Concern>().ok()),
        advice: Some(advice),
    }
    .into_response()
}
