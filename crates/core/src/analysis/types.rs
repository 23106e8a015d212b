//! Types for analysis requests and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Supported generation model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gemini-3-flash-preview")]
    Gemini3FlashPreview,
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
}

impl ModelId {
    /// All supported models, default first.
    pub const ALL: [ModelId; 3] = [
        ModelId::Gemini3FlashPreview,
        ModelId::Gemini25Flash,
        ModelId::Gemini25Pro,
    ];

    /// Wire identifier sent to the generation backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gemini3FlashPreview => "gemini-3-flash-preview",
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini25Pro => "gemini-2.5-pro",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| AnalysisError::UnknownModel(s.to_string()))
    }
}

/// A validated request to analyze a passage.
///
/// The text is trimmed on construction and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    text: String,
    model: ModelId,
}

impl AnalysisRequest {
    pub fn new(text: &str, model: ModelId) -> Result<Self, AnalysisError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::EmptyText);
        }
        Ok(Self {
            text: text.to_string(),
            model,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn model(&self) -> ModelId {
        self.model
    }
}

/// A theme label with its semantic weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeWeight {
    /// Theme label (usually Arabic).
    pub theme: String,
    /// Weight in [0.0, 1.0].
    pub weight: f64,
    /// English label for the theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_label: Option<String>,
}

/// Structured result of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The analyzed text, trimmed.
    pub original_text: String,
    /// Key roots or concepts, in order.
    pub decomposition: Vec<String>,
    /// Weighted themes, in the order the backend returned them.
    pub themes: Vec<ThemeWeight>,
    /// Linear combination string, e.g. `V = 0.8 * Iman + 0.2 * Sabr`.
    pub equation: String,
    /// Conclusion drawn from the weights alone.
    pub deduction: String,
    /// Prose elaboration.
    pub religious_article: String,
    /// Dominant theme as reported by the backend. Not recomputed.
    pub dominant_theme: String,
}

impl AnalysisResult {
    /// Theme with the maximum weight, first one on ties.
    pub fn computed_dominant_theme(&self) -> Option<&ThemeWeight> {
        self.themes.iter().fold(None, |best, t| match best {
            Some(b) if b.weight >= t.weight => Some(b),
            _ => Some(t),
        })
    }

    /// Whether the reported dominant theme matches the heaviest theme.
    ///
    /// A mismatch is a data quality signal, never an error. Matches on
    /// either the theme label or its English label.
    pub fn has_consistent_dominant_theme(&self) -> bool {
        let Some(top) = self.computed_dominant_theme() else {
            return true;
        };
        let reported = self.dominant_theme.trim();
        top.theme.trim() == reported
            || top
                .english_label
                .as_deref()
                .is_some_and(|label| label.trim().eq_ignore_ascii_case(reported))
    }
}

/// What a successful `analyze` call hands back to the caller.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    /// True when served from the fingerprint cache without an external call.
    pub from_cache: bool,
}
