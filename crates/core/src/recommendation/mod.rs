//! Rule-based product recommender.
//!
//! A [`RecommendationTable`] maps a `(SkinType, Concern)` pair to a single
//! product suggestion. The table is immutable once built: load it at startup
//! and share it.
//!
//! Only some pairs have a rule. Any other pair gets [`Advice::Fallback`],
//! which is a normal outcome rather than an error.

mod selection;

pub use selection::{Concern, SkinType, UnknownSelection};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Rules shipped with the crate.
const BUILTIN_RULES: &str = include_str!("rules.json");

/// Shown when one of the selections is missing.
pub const SELECTION_REQUIRED_MESSAGE: &str = "Please select both skin type and concern.";

/// Shown when the pair has no rule.
pub const FALLBACK_MESSAGE: &str = "Our herbal experts recommend a custom blend for your unique needs! Contact us for personalized advice.";

/// Errors that can occur when loading a rule table.
#[derive(thiserror::Error, Debug)]
pub enum RecommendationError {
    /// The rule document is not valid JSON or has the wrong shape.
    #[error("invalid rule table: {0}")]
    Parse(#[from] serde_json::Error),
    /// The same pair appears more than once.
    #[error("duplicate rule for {skin_type}-{concern}")]
    DuplicateRule {
        /// Skin type of the repeated rule.
        skin_type: SkinType,
        /// Concern of the repeated rule.
        concern: Concern,
    },
}

/// A product suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Decorative emoji shown before the product name.
    pub icon: String,
    /// Product name, e.g. "Neem & Aloe Soap".
    pub product: String,
    /// Short benefit phrase, e.g. "for acne control".
    pub benefit: String,
    /// Longer description of why the product fits.
    pub description: String,
}

#[derive(Deserialize)]
struct Rule {
    skin_type: SkinType,
    concern: Concern,
    #[serde(flatten)]
    recommendation: Recommendation,
}

/// How a recommendation result should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// The user has to change their input.
    Alert,
    /// A usable answer.
    Success,
}

/// Outcome of [`RecommendationTable::recommend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice<'a> {
    /// One or both selections are missing.
    SelectionRequired,
    /// A rule exists for the pair.
    Matched(&'a Recommendation),
    /// Both selections are present but no rule covers them.
    Fallback,
}

impl Advice<'_> {
    /// Presentation tone for this outcome.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::SelectionRequired => Tone::Alert,
            Self::Matched(_) | Self::Fallback => Tone::Success,
        }
    }

    /// Plain-text rendering.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::SelectionRequired => SELECTION_REQUIRED_MESSAGE.to_owned(),
            Self::Matched(rec) => format!(
                "{} {} - {}\n{}",
                rec.icon, rec.product, rec.benefit, rec.description
            ),
            Self::Fallback => format!("🌿 {FALLBACK_MESSAGE}"),
        }
    }
}

/// Immutable lookup table of recommendation rules.
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    rules: HashMap<(SkinType, Concern), Recommendation>,
}

impl RecommendationTable {
    /// The rule table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded table is malformed.
    pub fn builtin() -> Result<Self, RecommendationError> {
        Self::from_json(BUILTIN_RULES)
    }

    /// Parse a rule table from a JSON array of rules.
    ///
    /// Each rule has `skin_type`, `concern`, `icon`, `product`, `benefit`
    /// and `description` fields.
    ///
    /// # Errors
    ///
    /// Returns `RecommendationError::Parse` if the JSON is malformed and
    /// `RecommendationError::DuplicateRule` if a pair is listed twice.
    pub fn from_json(json: &str) -> Result<Self, RecommendationError> {
        let parsed: Vec<Rule> = serde_json::from_str(json)?;

        let mut rules = HashMap::with_capacity(parsed.len());
        for rule in parsed {
            let key = (rule.skin_type, rule.concern);
            if rules.insert(key, rule.recommendation).is_some() {
                return Err(RecommendationError::DuplicateRule {
                    skin_type: key.0,
                    concern: key.1,
                });
            }
        }

        Ok(Self { rules })
    }

    /// Look up the rule for a pair.
    #[must_use]
    pub fn get(&self, skin_type: SkinType, concern: Concern) -> Option<&Recommendation> {
        self.rules.get(&(skin_type, concern))
    }

    /// Number of rules in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Recommend a product for raw form selections.
    ///
    /// Empty or unrecognised values count as "not selected".
    #[must_use]
    pub fn recommend(&self, skin_type: &str, concern: &str) -> Advice<'_> {
        let (Ok(skin_type), Ok(concern)) = (skin_type.parse(), concern.parse()) else {
            return Advice::SelectionRequired;
        };
        self.recommend_for(skin_type, concern)
    }

    /// Recommend a product for a typed pair.
    #[must_use]
    pub fn recommend_for(&self, skin_type: SkinType, concern: Concern) -> Advice<'_> {
        self.get(skin_type, concern)
            .map_or(Advice::Fallback, Advice::Matched)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table() -> RecommendationTable {
        RecommendationTable::builtin().unwrap()
    }

    #[test]
    fn test_builtin_has_fourteen_rules() {
        assert_eq!(table().len(), 14);
    }

    #[test]
    fn test_oily_acne() {
        let table = table();
        let Advice::Matched(rec) = table.recommend("oily", "acne") else {
            panic!("expected a match for oily-acne");
        };
        assert_eq!(rec.product, "Neem & Aloe Soap");
        assert_eq!(rec.benefit, "for acne control");
        assert!(rec.description.starts_with("Neem's antibacterial"));
    }

    #[test]
    fn test_missing_selection_prompts_for_both() {
        let table = table();
        let advice = table.recommend("", "glow");
        assert_eq!(advice, Advice::SelectionRequired);
        assert_eq!(advice.tone(), Tone::Alert);
        assert_eq!(advice.to_plain_text(), SELECTION_REQUIRED_MESSAGE);

        assert_eq!(table.recommend("dry", ""), Advice::SelectionRequired);
        assert_eq!(table.recommend("", ""), Advice::SelectionRequired);
    }

    #[test]
    fn test_unknown_value_counts_as_unselected() {
        assert_eq!(table().recommend("oily", "wrinkles"), Advice::SelectionRequired);
    }

    #[test]
    fn test_unmapped_pair_falls_back() {
        let table = table();
        let advice = table.recommend("dry", "acne");
        assert_eq!(advice, Advice::Fallback);
        assert_eq!(advice.tone(), Tone::Success);
        assert!(advice.to_plain_text().contains(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_every_mapped_pair_is_reachable() {
        let table = table();
        let matched = SkinType::ALL
            .into_iter()
            .flat_map(|s| Concern::ALL.into_iter().map(move |c| (s, c)))
            .filter(|&(s, c)| matches!(table.recommend_for(s, c), Advice::Matched(_)))
            .count();
        assert_eq!(matched, 14);
    }

    #[test]
    fn test_plain_text_includes_all_parts() {
        let table = table();
        let text = table.recommend("normal", "dandruff").to_plain_text();
        assert!(text.contains("Hibiscus & Amla Shampoo"));
        assert!(text.contains("for healthy scalp"));
        assert!(text.contains("amla nourishes the scalp"));
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let json = r#"[
            {"skin_type": "oily", "concern": "acne", "icon": "", "product": "A", "benefit": "b", "description": "c"},
            {"skin_type": "oily", "concern": "acne", "icon": "", "product": "B", "benefit": "b", "description": "c"}
        ]"#;
        let err = RecommendationTable::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            RecommendationError::DuplicateRule {
                skin_type: SkinType::Oily,
                concern: Concern::Acne
            }
        ));
    }

    #[test]
    fn test_unknown_enum_value_in_table_rejected() {
        let json = r#"[{"skin_type": "combination", "concern": "acne", "icon": "", "product": "A", "benefit": "b", "description": "c"}]"#;
        assert!(matches!(
            RecommendationTable::from_json(json),
            Err(RecommendationError::Parse(_))
        ));
    }
}
