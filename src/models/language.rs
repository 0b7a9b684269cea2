//! Language model
//!
//! This module provides:
//! - `Language`, the closed set of content languages
//! - `Translations`, a per-language optional string used by every
//!   translatable recipe field

use serde::{Deserialize, Deserializer, Serialize};

/// Supported content language
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Bulgarian
    Bg,
}

impl Language {
    /// Every supported language, in display order
    pub const ALL: [Language; 2] = [Language::En, Language::Bg];

    /// Language code used in storage, query strings and JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Bg => "bg",
        }
    }

    /// Parse a language code or a BCP 47 tag such as `bg-BG`
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.split(['-', '_']).next().unwrap_or("").trim();
        match primary.to_lowercase().as_str() {
            "en" => Some(Language::En),
            "bg" => Some(Language::Bg),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| anyhow::anyhow!("Unsupported language: {}", s))
    }
}

/// A translatable text value, one optional string per language.
///
/// Serialized as a JSON object keyed by language code, e.g.
/// `{"en": "Soup", "bg": "Супа"}`. Absent keys, `null` and non-string values
/// all read back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, language: Language, value: impl Into<String>) -> Self {
        self.set(language, Some(value.into()));
        self
    }

    /// Raw value for a language
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::En => self.en.as_deref(),
            Language::Bg => self.bg.as_deref(),
        }
    }

    pub fn set(&mut self, language: Language, value: Option<String>) {
        match language {
            Language::En => self.en = value,
            Language::Bg => self.bg = value,
        }
    }

    /// True when the value for `language` is non-empty after trimming
    pub fn is_present(&self, language: Language) -> bool {
        self.get(language)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }

    /// Trimmed value for `language`, falling back to the first other language
    /// that has content.
    pub fn resolve(&self, language: Language) -> Option<&str> {
        std::iter::once(language)
            .chain(Language::ALL.into_iter().filter(|l| *l != language))
            .find(|l| self.is_present(*l))
            .and_then(|l| self.get(l))
            .map(str::trim)
    }

    /// True when no language has content
    pub fn is_blank(&self) -> bool {
        !Language::ALL.iter().any(|l| self.is_present(*l))
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
