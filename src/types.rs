// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for translation catalogs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an entry in a table's entry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryId(pub(crate) usize);

/// Where a source string is used in the UI definition.
///
/// Traceability metadata for translator tooling; lookup never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.filename, line),
            None => write!(f, "{}", self.filename),
        }
    }
}

/// Translation state as recorded by the translation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    #[default]
    Finished,
    Unfinished,
    /// The source string no longer exists in the UI.
    Obsolete,
    /// Like obsolete, but recorded by newer tooling.
    Vanished,
}

impl TranslationStatus {
    /// Parse the value of a TS `type` attribute.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" | "finished" => Some(TranslationStatus::Finished),
            "unfinished" => Some(TranslationStatus::Unfinished),
            "obsolete" => Some(TranslationStatus::Obsolete),
            "vanished" => Some(TranslationStatus::Vanished),
            _ => None,
        }
    }

    /// The TS `type` attribute value, or `None` for finished entries.
    pub fn as_attribute(self) -> Option<&'static str> {
        match self {
            TranslationStatus::Finished => None,
            TranslationStatus::Unfinished => Some("unfinished"),
            TranslationStatus::Obsolete => Some("obsolete"),
            TranslationStatus::Vanished => Some("vanished"),
        }
    }

    /// Obsolete and vanished strings are kept for translator memory only.
    pub fn is_retired(self) -> bool {
        matches!(
            self,
            TranslationStatus::Obsolete | TranslationStatus::Vanished
        )
    }

    pub fn is_finished(&self) -> bool {
        *self == TranslationStatus::Finished
    }

    /// Ordering used when duplicate occurrences merge: the status that
    /// lookup serves most readily wins.
    pub(crate) fn serve_rank(self) -> u8 {
        match self {
            TranslationStatus::Finished => 2,
            TranslationStatus::Unfinished => 1,
            TranslationStatus::Obsolete | TranslationStatus::Vanished => 0,
        }
    }
}

/// One logical translation entry.
///
/// Occurrences of the same `(context, source, disambiguation)` key are
/// merged into a single entry; their locations live in the table's side
/// list, see [`crate::Table::locations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub context: String,
    pub source: String,
    /// Developer comment distinguishing identical source strings.
    pub disambiguation: Option<String>,
    /// May be empty: a deliberate pass-through.
    pub translation: String,
    /// Every `<numerusform>` of a numerus message, in order.
    pub numerus_forms: Vec<String>,
    pub status: TranslationStatus,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
}

impl Entry {
    pub fn is_numerus(&self) -> bool {
        !self.numerus_forms.is_empty()
    }

    pub fn has_translation(&self) -> bool {
        !self.translation.is_empty()
    }
}

/// A message as read from a resource, before it is merged into a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub source: String,
    pub disambiguation: Option<String>,
    pub translation: String,
    pub numerus_forms: Vec<String>,
    pub status: TranslationStatus,
    pub locations: Vec<Location>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
}

/// Document-level attributes of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceHeader {
    pub version: String,
    pub language: Option<String>,
    pub source_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_attribute_roundtrip() {
        for status in [
            TranslationStatus::Finished,
            TranslationStatus::Unfinished,
            TranslationStatus::Obsolete,
            TranslationStatus::Vanished,
        ] {
            let attr = status.as_attribute().unwrap_or("");
            assert_eq!(TranslationStatus::parse(attr), Some(status));
        }
        assert_eq!(TranslationStatus::parse("draft"), None);
    }

    #[test]
    fn retired_statuses() {
        assert!(TranslationStatus::Obsolete.is_retired());
        assert!(TranslationStatus::Vanished.is_retired());
        assert!(!TranslationStatus::Unfinished.is_retired());
    }

    #[test]
    fn serve_rank_orders_statuses() {
        assert!(TranslationStatus::Finished.serve_rank() > TranslationStatus::Unfinished.serve_rank());
        assert!(TranslationStatus::Unfinished.serve_rank() > TranslationStatus::Vanished.serve_rank());
        assert_eq!(
            TranslationStatus::Obsolete.serve_rank(),
            TranslationStatus::Vanished.serve_rank()
        );
    }

    #[test]
    fn location_display() {
        let loc = Location::new("../config_dialog.ui", Some(496));
        assert_eq!(loc.to_string(), "../config_dialog.ui:496");
        assert_eq!(Location::new("a.ui", None).to_string(), "a.ui");
    }
}
