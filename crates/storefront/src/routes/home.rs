//! Home page route handler.
//!
//! The landing page carries the skincare assistant: two selects and a
//! result panel, opened as a popup.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use herbal_glow_core::{Advice, Concern, SkinType, recommendation::FALLBACK_MESSAGE};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::routes::notice::tone_class;

/// One `<option>` in a select.
#[derive(Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Skin type options, marking `selected`.
#[must_use]
pub fn skin_type_options(selected: Option<SkinType>) -> Vec<SelectOption> {
    SkinType::ALL
        .into_iter()
        .map(|s| SelectOption {
            value: s.as_str(),
            label: s.label(),
            selected: selected == Some(s),
        })
        .collect()
}

/// Concern options, marking `selected`.
#[must_use]
pub fn concern_options(selected: Option<Concern>) -> Vec<SelectOption> {
    Concern::ALL
        .into_iter()
        .map(|c| SelectOption {
            value: c.as_str(),
            label: c.label(),
            selected: selected == Some(c),
        })
        .collect()
}

/// Recommendation result prepared for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdviceView {
    /// CSS tone modifier.
    pub tone: &'static str,
    /// Bold first line, present for matched rules.
    pub headline: Option<String>,
    pub detail: String,
}

impl From<Advice<'_>> for AdviceView {
    fn from(advice: Advice<'_>) -> Self {
        let tone = tone_class(advice.tone());
        match advice {
            Advice::Matched(rec) => Self {
                tone,
                headline: Some(format!("{} {} - {}", rec.icon, rec.product, rec.benefit)),
                detail: rec.description.clone(),
            },
            Advice::Fallback => Self {
                tone,
                headline: None,
                detail: format!("🌿 {FALLBACK_MESSAGE}"),
            },
            Advice::SelectionRequired => Self {
                tone,
                headline: None,
                detail: advice.to_plain_text(),
            },
        }
    }
}

/// Recommendation result fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/recommendation.html")]
pub struct RecommendationFragment {
    pub advice: AdviceView,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub skin_types: Vec<SelectOption>,
    pub concerns: Vec<SelectOption>,
    /// Result to show; the popup starts open when present.
    pub advice: Option<AdviceView>,
}

impl HomeTemplate {
    /// Home page with nothing selected.
    #[must_use]
    pub fn blank(current_user: Option<CurrentUser>) -> Self {
        Self {
            current_user,
            skin_types: skin_type_options(None),
            concerns: concern_options(None),
            advice: None,
        }
    }
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate::blank(user)
}
