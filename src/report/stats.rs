// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-context translation coverage

use crate::error::LoadWarning;
use crate::table::Table;
use crate::types::{Entry, TranslationStatus};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Message counts for one context, or for the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub messages: usize,
    /// Entries lookup would translate.
    pub translated: usize,
    /// Live entries with an empty translation.
    pub empty: usize,
    pub unfinished: usize,
    /// Obsolete or vanished entries.
    pub obsolete: usize,
    pub locations: usize,
}

impl Counts {
    fn add_entry(&mut self, table: &Table, entry: &Entry) {
        self.messages += 1;
        if table.serves(entry) {
            self.translated += 1;
        }
        if entry.status.is_retired() {
            self.obsolete += 1;
        } else if !entry.has_translation() {
            self.empty += 1;
        }
        if entry.status == TranslationStatus::Unfinished {
            self.unfinished += 1;
        }
        self.locations += table.locations(entry.id).len();
    }

    fn absorb(&mut self, other: &Counts) {
        self.messages += other.messages;
        self.translated += other.translated;
        self.empty += other.empty;
        self.unfinished += other.unfinished;
        self.obsolete += other.obsolete;
        self.locations += other.locations;
    }

    /// Share of messages that lookup translates, as a percentage.
    pub fn coverage(&self) -> f64 {
        if self.messages == 0 {
            return 100.0;
        }
        self.translated as f64 * 100.0 / self.messages as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub name: String,
    #[serde(flatten)]
    pub counts: Counts,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub locale: Option<String>,
    pub version: String,
    pub fingerprint: String,
    pub created_at: String,
    pub include_unfinished: bool,
    pub contexts: Vec<ContextStats>,
    pub totals: Counts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LoadWarning>,
}

impl CatalogStats {
    pub fn collect(table: &Table) -> Self {
        let contexts: Vec<ContextStats> = table
            .contexts()
            .iter()
            .map(|name| {
                let mut counts = Counts::default();
                for entry in table.entries_in(name) {
                    counts.add_entry(table, entry);
                }
                ContextStats {
                    name: name.clone(),
                    counts,
                }
            })
            .collect();

        let mut totals = Counts::default();
        for context in &contexts {
            totals.absorb(&context.counts);
        }

        Self {
            locale: table
                .locale()
                .map(|locale| locale.to_string())
                .or_else(|| table.declared_language().map(str::to_string)),
            version: table.format_version().to_string(),
            fingerprint: table.fingerprint(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            include_unfinished: table.include_unfinished(),
            contexts,
            totals,
            warnings: table.warnings().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ja_JP">
<context>
    <name>ConfigDialog</name>
    <message>
        <location filename="../config_dialog.ui" line="305"/>
        <location filename="../config_dialog.ui" line="332"/>
        <source>Table</source>
        <translation>テーブル</translation>
    </message>
    <message>
        <location filename="../config_dialog.ui" line="404"/>
        <source>-</source>
        <translation></translation>
    </message>
    <message>
        <source>Draft</source>
        <translation type="unfinished">下書き</translation>
    </message>
</context>
<context>
    <name>Other</name>
    <message>
        <source>Gone</source>
        <translation type="vanished">消えた</translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn counts_per_context() {
        let table = Table::load_str(SAMPLE).expect("should load");
        let stats = CatalogStats::collect(&table);

        assert_eq!(stats.locale.as_deref(), Some("ja_JP"));
        assert_eq!(stats.contexts.len(), 2);

        let dialog = &stats.contexts[0].counts;
        assert_eq!(dialog.messages, 3);
        assert_eq!(dialog.translated, 2);
        assert_eq!(dialog.empty, 1);
        assert_eq!(dialog.unfinished, 1);
        assert_eq!(dialog.locations, 3);

        assert_eq!(stats.totals.messages, 4);
        assert_eq!(stats.totals.obsolete, 1);
        assert_eq!(stats.fingerprint, table.fingerprint());
    }

    #[test]
    fn empty_catalog_is_fully_covered() {
        assert_eq!(Counts::default().coverage(), 100.0);
    }

    #[test]
    fn serializes_flat_counts() {
        let table = Table::load_str(SAMPLE).expect("should load");
        let json = serde_json::to_value(table.stats()).expect("should serialize");
        assert_eq!(json["contexts"][0]["name"], "ConfigDialog");
        assert_eq!(json["contexts"][0]["messages"], 3);
        assert_eq!(json["totals"]["translated"], 2);
    }
}
