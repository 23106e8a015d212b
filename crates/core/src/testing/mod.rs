//! Testing utilities and mock implementations.
//!
//! Mocks for the two external seams (generation backend and verse source)
//! so the orchestrator and the HTTP layer can be exercised without network.
//!
//! # Example
//!
//! ```rust,ignore
//! use mizan_core::testing::{fixtures, MockGenerationClient, MockVerseSource};
//!
//! let client = MockGenerationClient::new();
//! client.set_response(fixtures::analysis_response_json(&[("الصبر", 0.9)])).await;
//!
//! let verses = MockVerseSource::new();
//! verses.add_collection(fixtures::collection(1, 7)).await;
//! ```

mod mock_generation_client;
mod mock_verse_source;

pub use mock_generation_client::MockGenerationClient;
pub use mock_verse_source::{MockVerseSource, RecordedVerseQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::analysis::{AnalysisResult, ThemeWeight};
    use crate::verse_source::{Collection, Unit};

    /// Create a theme weight without an English label.
    pub fn theme(name: &str, weight: f64) -> ThemeWeight {
        ThemeWeight {
            theme: name.to_string(),
            weight,
            english_label: None,
        }
    }

    /// Create a plausible analysis result for `text`.
    pub fn analysis_result(text: &str) -> AnalysisResult {
        AnalysisResult {
            original_text: text.to_string(),
            decomposition: vec!["ص ب ر".to_string(), "أ م ن".to_string()],
            themes: vec![
                ThemeWeight {
                    theme: "الصبر".to_string(),
                    weight: 0.9,
                    english_label: Some("Patience".to_string()),
                },
                ThemeWeight {
                    theme: "الإيمان".to_string(),
                    weight: 0.6,
                    english_label: Some("Faith".to_string()),
                },
            ],
            equation: "V = 0.9 * Sabr + 0.6 * Iman".to_string(),
            deduction: "Patience carries the most weight.".to_string(),
            religious_article: "الصبر مفتاح الفرج.".to_string(),
            dominant_theme: "الصبر".to_string(),
        }
    }

    /// Raw backend answer with the given themes.
    ///
    /// The first theme is reported as dominant.
    pub fn analysis_response_json(themes: &[(&str, f64)]) -> String {
        let equation = themes
            .iter()
            .enumerate()
            .map(|(i, (_, weight))| format!("{} * Theme{}", weight, i + 1))
            .collect::<Vec<_>>()
            .join(" + ");

        serde_json::json!({
            "decomposition": ["ص ب ر"],
            "themes": themes
                .iter()
                .map(|(theme, weight)| serde_json::json!({ "theme": theme, "weight": weight }))
                .collect::<Vec<_>>(),
            "equation": format!("V = {}", equation),
            "deduction": "The heaviest theme dominates.",
            "religiousArticle": "مقال قصير.",
            "dominantTheme": themes.first().map(|(theme, _)| *theme).unwrap_or_default(),
        })
        .to_string()
    }

    /// Create a collection whose unit `n` reads `"unit {n} of {index}"`.
    pub fn collection(index: u32, unit_count: u32) -> Collection {
        Collection {
            index,
            name: format!("سورة {}", index),
            units: (1..=unit_count)
                .map(|ordinal| Unit {
                    ordinal,
                    text: format!("unit {} of {}", ordinal, index),
                })
                .collect(),
        }
    }
}
