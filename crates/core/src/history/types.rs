//! History types.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// One entry in the history log. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryItem {
    /// Time-derived unique id.
    pub id: String,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
    pub result: AnalysisResult,
}

/// A history entry brought back as the current analysis.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestoredAnalysis {
    /// The stored result, to display as the current result.
    pub result: AnalysisResult,
    /// The stored input text, to put back in the editor.
    pub input_text: String,
}

/// Project a history entry back into the current result and input.
///
/// No external call and no re-validation of the stored data.
pub fn restore(item: &HistoryItem) -> RestoredAnalysis {
    RestoredAnalysis {
        result: item.result.clone(),
        input_text: item.result.original_text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_restore_reproduces_result_and_input() {
        let item = HistoryItem {
            id: "1700000000000".to_string(),
            timestamp: 1_700_000_000_000,
            result: fixtures::analysis_result("وَاصْبِرْ"),
        };

        let restored = restore(&item);
        assert_eq!(restored.result, item.result);
        assert_eq!(restored.input_text, "وَاصْبِرْ");
    }

    #[test]
    fn test_restore_does_not_validate() {
        let mut result = fixtures::analysis_result("text");
        result.themes[0].weight = 7.0;
        let item = HistoryItem {
            id: "1".to_string(),
            timestamp: 1,
            result,
        };
        assert_eq!(restore(&item).result.themes[0].weight, 7.0);
    }

    #[test]
    fn test_history_item_wire_format() {
        let item = HistoryItem {
            id: "42".to_string(),
            timestamp: 42,
            result: fixtures::analysis_result("text"),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["timestamp"], 42);
        assert_eq!(json["result"]["originalText"], "text");
    }
}
