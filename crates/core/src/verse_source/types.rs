//! Types for the verse source.

use serde::{Deserialize, Serialize};

use super::VerseSourceError;

/// Catalog entry for one collection (a surah).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    /// 1-based collection index.
    pub index: u32,
    /// Collection name (Arabic).
    pub name: String,
    /// Transliterated name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    /// Translated name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name_translation: Option<String>,
    /// Number of units in the collection.
    pub unit_count: u32,
    /// Revelation place ("Meccan" / "Medinan").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revelation_type: Option<String>,
}

/// A full collection payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub index: u32,
    pub name: String,
    /// Units as returned by the source, not necessarily sorted.
    pub units: Vec<Unit>,
}

/// One addressable text unit (a verse).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    /// 1-based position within the collection.
    pub ordinal: u32,
    pub text: String,
}

impl Unit {
    /// Text followed by its ordinal marker, e.g. `بِسْمِ اللَّهِ ﴿1﴾`.
    pub fn annotated(&self) -> String {
        format!("{} \u{FD3F}{}\u{FD3E}", self.text, self.ordinal)
    }
}

/// A validated verse range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRangeQuery {
    collection_index: u32,
    start_unit: u32,
    end_unit: u32,
}

impl VerseRangeQuery {
    pub fn new(collection_index: u32, start_unit: u32, end_unit: u32) -> Result<Self, VerseSourceError> {
        if collection_index == 0 {
            return Err(VerseSourceError::InvalidRange(
                "collection index must be at least 1".to_string(),
            ));
        }
        if start_unit == 0 {
            return Err(VerseSourceError::InvalidRange(
                "start unit must be at least 1".to_string(),
            ));
        }
        if end_unit < start_unit {
            return Err(VerseSourceError::InvalidRange(format!(
                "end unit {} is before start unit {}",
                end_unit, start_unit
            )));
        }
        Ok(Self {
            collection_index,
            start_unit,
            end_unit,
        })
    }

    pub fn collection_index(&self) -> u32 {
        self.collection_index
    }

    pub fn start_unit(&self) -> u32 {
        self.start_unit
    }

    pub fn end_unit(&self) -> u32 {
        self.end_unit
    }

    /// Whether `ordinal` lies in the inclusive range.
    pub fn contains(&self, ordinal: u32) -> bool {
        (self.start_unit..=self.end_unit).contains(&ordinal)
    }
}
