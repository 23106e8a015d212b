//! Builds the schema-constrained generation request and validates the answer.

use serde::Deserialize;
use serde_json::{json, Value};

use super::types::{AnalysisRequest, AnalysisResult, ThemeWeight};
use super::AnalysisError;
use crate::generation::GenerationRequest;

/// MIME type the backend must answer with.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

const WEIGHT_MIN: f64 = 0.0;
const WEIGHT_MAX: f64 = 1.0;

/// Build the complete generation request for an analysis.
///
/// Pure: no I/O, same input always gives the same request.
pub fn build_generation_request(request: &AnalysisRequest, temperature: f32) -> GenerationRequest {
    GenerationRequest {
        model: request.model(),
        instruction: build_instruction(request.text()),
        response_mime_type: RESPONSE_MIME_TYPE.to_string(),
        response_schema: analysis_schema(),
        temperature,
    }
}

/// Instruction describing the five required operations.
pub fn build_instruction(text: &str) -> String {
    format!(
        r#"Act as the Quranomics Engine (محرك قرآنوميكا). Analyze the given Quranic text with a mathematical, structural approach, then turn the findings into a religious insight.

Input text: "{text}"

Perform these operations:
1. Decomposition: break the text into its key roots or concepts, in Arabic.
2. Theme weighting: identify the major themes (e.g. Tawheed, Rahma, Sabr) and give each a weight between 0.0 and 1.0.
3. Equation: write a linear combination representing the verse as V, in the form "V = w1 * Theme1 + w2 * Theme2 + ...", using the weights from step 2.
4. Deduction: state a logical conclusion derived only from the weights, in Arabic.
5. Religious article: write one paragraph in classical Arabic jurisprudential style (لغة فقهية جزلة ورصينة) about the divine balance (الميزان الإلهي) the weights and equation reveal. Open with a phrase such as "وباستقراء البنية الدلالية للنص...".

Report the theme with the highest weight as dominantTheme.
Return strict JSON only."#
    )
}

/// Output schema: all six top-level fields required, weight bounded.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "decomposition": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Key roots or words of the text, in Arabic"
            },
            "themes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "theme": { "type": "STRING", "description": "Theme name in Arabic" },
                        "weight": {
                            "type": "NUMBER",
                            "minimum": WEIGHT_MIN,
                            "maximum": WEIGHT_MAX,
                            "description": "Weight of the theme from 0.0 to 1.0"
                        },
                        "englishLabel": { "type": "STRING", "description": "English label" }
                    },
                    "required": ["theme", "weight"]
                },
                "description": "Themes present in the text with their semantic weights"
            },
            "equation": {
                "type": "STRING",
                "description": "Linear combination, e.g. V = 0.8 * Iman + 0.2 * Sabr"
            },
            "deduction": {
                "type": "STRING",
                "description": "Logical deduction from the weights, in Arabic"
            },
            "religiousArticle": {
                "type": "STRING",
                "description": "Paragraph in classical jurisprudential style explaining the balance found"
            },
            "dominantTheme": {
                "type": "STRING",
                "description": "Theme with the highest weight, in Arabic"
            }
        },
        "required": [
            "decomposition",
            "themes",
            "equation",
            "deduction",
            "religiousArticle",
            "dominantTheme"
        ]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    decomposition: Vec<String>,
    themes: Vec<ThemeWeight>,
    equation: String,
    deduction: String,
    religious_article: String,
    dominant_theme: String,
}

/// Slice from the first `{` to the last `}`, or the whole input.
fn outermost_object(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}

/// Body of the first ``` fenced block, language tag skipped.
fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let after_fence = &raw[open + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Parse and validate the backend's answer.
pub fn parse_analysis_response(
    original_text: &str,
    raw: &str,
) -> Result<AnalysisResult, AnalysisError> {
    // Tolerate markdown fences or stray prose around the object
    let parsed: RawAnalysis = match serde_json::from_str(outermost_object(raw)) {
        Ok(parsed) => parsed,
        Err(e) => fenced_block(raw)
            .and_then(|block| serde_json::from_str(outermost_object(block)).ok())
            .ok_or_else(|| AnalysisError::Contract(format!("{}", e)))?,
    };

    for theme in &parsed.themes {
        if !theme.weight.is_finite() || !(WEIGHT_MIN..=WEIGHT_MAX).contains(&theme.weight) {
            return Err(AnalysisError::Contract(format!(
                "weight for theme '{}' out of range: {}",
                theme.theme, theme.weight
            )));
        }
    }

    Ok(AnalysisResult {
        original_text: original_text.to_string(),
        decomposition: parsed.decomposition,
        themes: parsed.themes,
        equation: parsed.equation,
        deduction: parsed.deduction,
        religious_article: parsed.religious_article,
        dominant_theme: parsed.dominant_theme,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ModelId;
    use crate::testing::fixtures;

    #[test]
    fn test_request_carries_model_schema_and_text() {
        let request = AnalysisRequest::new("  إِنَّ اللَّهَ مَعَ الصَّابِرِينَ ", ModelId::Gemini25Pro).unwrap();
        let generation = build_generation_request(&request, 0.4);

        assert_eq!(generation.model, ModelId::Gemini25Pro);
        assert_eq!(generation.response_mime_type, "application/json");
        assert_eq!(generation.temperature, 0.4);
        assert!(generation
            .instruction
            .contains("\"إِنَّ اللَّهَ مَعَ الصَّابِرِينَ\""));
        assert_eq!(generation.response_schema, analysis_schema());
    }

    #[test]
    fn test_builder_is_pure() {
        let request = AnalysisRequest::new("text", ModelId::default()).unwrap();
        assert_eq!(
            build_generation_request(&request, 0.4),
            build_generation_request(&request, 0.4)
        );
    }

    #[test]
    fn test_instruction_names_all_operations() {
        let instruction = build_instruction("x");
        for needle in [
            "Decomposition",
            "Theme weighting",
            "V = w1 * Theme1 + w2 * Theme2",
            "Deduction",
            "Religious article",
        ] {
            assert!(instruction.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = analysis_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec![
                "decomposition",
                "themes",
                "equation",
                "deduction",
                "religiousArticle",
                "dominantTheme"
            ]
        );

        let weight = &schema["properties"]["themes"]["items"]["properties"]["weight"];
        assert_eq!(weight["type"], "NUMBER");
        assert_eq!(weight["minimum"], 0.0);
        assert_eq!(weight["maximum"], 1.0);
    }

    #[test]
    fn test_parse_valid_response() {
        let raw = fixtures::analysis_response_json(&[("الصبر", 0.9), ("الإيمان", 0.6)]);
        let result = parse_analysis_response("text", &raw).unwrap();

        assert_eq!(result.original_text, "text");
        assert_eq!(result.themes.len(), 2);
        assert_eq!(result.themes[0].weight, 0.9);
        assert_eq!(result.dominant_theme, "الصبر");
    }

    #[test]
    fn test_parse_response_in_code_block() {
        let raw = format!(
            "```json\n{}\n```",
            fixtures::analysis_response_json(&[("الرحمة", 0.5)])
        );
        assert!(parse_analysis_response("text", &raw).is_ok());
    }

    #[test]
    fn test_parse_brace_in_prose_before_fence() {
        let raw = format!(
            "Note {{x}} here:\n```json\n{}\n```",
            fixtures::analysis_response_json(&[("التقوى", 0.8)])
        );
        let result = parse_analysis_response("text", &raw).unwrap();
        assert_eq!(result.themes[0].theme, "التقوى");
    }

    #[test]
    fn test_parse_brace_in_prose_after_fence() {
        let raw = format!(
            "```\n{}\n```\nSee {{footnote}}.",
            fixtures::analysis_response_json(&[("الشكر", 0.3)])
        );
        let result = parse_analysis_response("text", &raw).unwrap();
        assert_eq!(result.dominant_theme, "الشكر");
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let raw = r#"{
            "decomposition": [],
            "themes": [],
            "equation": "V = 0",
            "deduction": "",
            "dominantTheme": ""
        }"#;
        let err = parse_analysis_response("text", raw).unwrap_err();
        assert!(matches!(err, AnalysisError::Contract(msg) if msg.contains("religiousArticle")));
    }

    #[test]
    fn test_parse_rejects_out_of_range_weight() {
        let raw = fixtures::analysis_response_json(&[("الصبر", 1.5)]);
        assert!(matches!(
            parse_analysis_response("text", &raw),
            Err(AnalysisError::Contract(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_weight() {
        let raw = r#"{
            "decomposition": ["صبر"],
            "themes": [{"theme": "الصبر", "weight": "high"}],
            "equation": "V = 1 * Sabr",
            "deduction": "d",
            "religiousArticle": "a",
            "dominantTheme": "الصبر"
        }"#;
        assert!(parse_analysis_response("text", raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_analysis_response("text", "I cannot help with that."),
            Err(AnalysisError::Contract(_))
        ));
    }
}
