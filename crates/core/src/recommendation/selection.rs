//! The two selections that drive the recommender.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A selection value that is not one of the known options.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownSelection {
    /// Which dropdown the value came from.
    pub kind: &'static str,
    /// The rejected value.
    pub value: String,
}

/// Skin type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkinType {
    Oily,
    Dry,
    Sensitive,
    Normal,
}

impl SkinType {
    /// All options, in dropdown order.
    pub const ALL: [Self; 4] = [Self::Oily, Self::Dry, Self::Sensitive, Self::Normal];

    /// Form value for this option.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Oily => "oily",
            Self::Dry => "dry",
            Self::Sensitive => "sensitive",
            Self::Normal => "normal",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Oily => "Oily",
            Self::Dry => "Dry",
            Self::Sensitive => "Sensitive",
            Self::Normal => "Normal",
        }
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkinType {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| UnknownSelection {
                kind: "skin type",
                value: s.to_owned(),
            })
    }
}

/// Skin or scalp concern selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Concern {
    Acne,
    OilControl,
    Glow,
    Dandruff,
    Calm,
}

impl Concern {
    /// All options, in dropdown order.
    pub const ALL: [Self; 5] = [
        Self::Acne,
        Self::OilControl,
        Self::Glow,
        Self::Dandruff,
        Self::Calm,
    ];

    /// Form value for this option.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acne => "acne",
            Self::OilControl => "oil-control",
            Self::Glow => "glow",
            Self::Dandruff => "dandruff",
            Self::Calm => "calm",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Acne => "Acne",
            Self::OilControl => "Oil control",
            Self::Glow => "Glow",
            Self::Dandruff => "Dandruff",
            Self::Calm => "Calm & soothe",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Concern {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| UnknownSelection {
                kind: "concern",
                value: s.to_owned(),
            })
    }
}
