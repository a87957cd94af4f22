// SPDX-License-Identifier: PMPL-1.0-or-later

//! JSON catalog format.
//!
//! Same relation as a TS document, flattened to plain JSON for tooling
//! that does not speak XML. The `version` field is checked before the rest
//! of the document is interpreted, so a future layout reports as
//! unsupported rather than malformed.

use crate::error::{CatalogError, Result};
use crate::table::{LoadOptions, Table, TableBuilder};
use crate::types::{Location, RawMessage, ResourceHeader, TranslationStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CURRENT_VERSION: u64 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonCatalog {
    version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_language: Option<String>,
    #[serde(default)]
    contexts: Vec<JsonContext>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonContext {
    name: String,
    #[serde(default)]
    messages: Vec<JsonMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonMessage {
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    translation: String,
    #[serde(default, skip_serializing_if = "TranslationStatus::is_finished")]
    status: TranslationStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    numerus_forms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    translator_comment: Option<String>,
}

fn syntax_error(err: serde_json::Error) -> CatalogError {
    let reason = format!("invalid JSON catalog: {}", err);
    if err.line() > 0 {
        CatalogError::malformed_at(err.line(), reason)
    } else {
        CatalogError::malformed(reason)
    }
}

/// `1` and `1.0` are the same JSON number.
fn is_current_version(version: &Value) -> bool {
    version.as_u64() == Some(CURRENT_VERSION)
        || version.as_f64() == Some(CURRENT_VERSION as f64)
}

pub(crate) fn read(text: &str, options: &LoadOptions) -> Result<Table> {
    let value: Value = serde_json::from_str(text).map_err(syntax_error)?;
    let object = value
        .as_object()
        .ok_or_else(|| CatalogError::malformed("JSON catalog must be an object"))?;

    match object.get("version") {
        None => return Err(CatalogError::malformed("JSON catalog has no \"version\"")),
        Some(version) if is_current_version(version) => {}
        Some(version) => {
            let found = match version {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let supported = CURRENT_VERSION.to_string();
            return Err(CatalogError::unsupported_version(found, &[supported.as_str()]));
        }
    }

    let mut value = value;
    value["version"] = Value::from(CURRENT_VERSION);
    let catalog: JsonCatalog = serde_json::from_value(value).map_err(syntax_error)?;
    let header = ResourceHeader {
        version: catalog.version.to_string(),
        language: catalog.language,
        source_language: catalog.source_language,
    };

    let mut builder = TableBuilder::new(header, options);
    for context in catalog.contexts {
        builder.begin_context(&context.name);
        for message in context.messages {
            let translation = match message.numerus_forms.first() {
                Some(first) => first.clone(),
                None => message.translation,
            };
            builder.push(
                &context.name,
                RawMessage {
                    source: message.source,
                    disambiguation: message.comment,
                    translation,
                    numerus_forms: message.numerus_forms,
                    status: message.status,
                    locations: message.locations,
                    extra_comment: message.extra_comment,
                    translator_comment: message.translator_comment,
                },
            )?;
        }
    }
    Ok(builder.finish())
}

/// Serialize a table as a pretty-printed JSON catalog.
pub fn write(table: &Table) -> Result<String> {
    let contexts = table
        .contexts()
        .iter()
        .map(|name| JsonContext {
            name: name.clone(),
            messages: table
                .entries_in(name)
                .map(|entry| JsonMessage {
                    source: entry.source.clone(),
                    comment: entry.disambiguation.clone(),
                    translation: entry.translation.clone(),
                    status: entry.status,
                    numerus_forms: entry.numerus_forms.clone(),
                    locations: table.locations(entry.id).to_vec(),
                    extra_comment: entry.extra_comment.clone(),
                    translator_comment: entry.translator_comment.clone(),
                })
                .collect(),
        })
        .collect();

    let catalog = JsonCatalog {
        version: CURRENT_VERSION,
        language: table.declared_language().map(str::to_string),
        source_language: table.source_locale().map(|locale| locale.to_string()),
        contexts,
    };
    Ok(serde_json::to_string_pretty(&catalog)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<Table> {
        read(text, &LoadOptions::default())
    }

    #[test]
    fn reads_minimal_catalog() {
        let table = load(
            r#"{ "version": 1, "language": "ja_JP", "contexts": [
                { "name": "ConfigDialog", "messages": [
                    { "source": "Table", "translation": "テーブル",
                      "locations": [ { "filename": "../config_dialog.ui", "line": 305 } ] },
                    { "source": "-", "translation": "" }
                ] } ] }"#,
        )
        .expect("should load");
        assert_eq!(table.lookup("ConfigDialog", "Table"), "テーブル");
        assert_eq!(table.lookup("ConfigDialog", "-"), "-");
        assert_eq!(table.format_version(), "1");
    }

    #[test]
    fn status_and_comment_fields() {
        let table = load(
            r#"{ "version": 1, "language": "ja_JP", "contexts": [
                { "name": "C", "messages": [
                    { "source": "Open", "comment": "verb", "translation": "開く" },
                    { "source": "Old", "translation": "古い", "status": "obsolete" }
                ] } ] }"#,
        )
        .expect("should load");
        assert_eq!(table.lookup_disambiguated("C", "Open", Some("verb")), "開く");
        assert_eq!(table.lookup("C", "Open"), "Open");
        assert_eq!(table.lookup("C", "Old"), "Old");
    }

    #[test]
    fn float_version_is_accepted() {
        let table = load(
            r#"{ "version": 1.0, "language": "ja_JP", "contexts": [
                { "name": "ConfigDialog", "messages": [
                    { "source": "Name", "translation": "名前" } ] } ] }"#,
        )
        .expect("should load");
        assert_eq!(table.lookup("ConfigDialog", "Name"), "名前");

        let err = load(r#"{ "version": 1.5, "contexts": [] }"#).expect_err("should fail");
        assert!(matches!(err, CatalogError::UnsupportedVersion { ref found, .. } if found == "1.5"));
    }

    #[test]
    fn unknown_version_is_unsupported() {
        let err = load(r#"{ "version": 7, "contexts": [] }"#).expect_err("should fail");
        assert!(matches!(err, CatalogError::UnsupportedVersion { ref found, .. } if found == "7"));
    }

    #[test]
    fn missing_translation_is_malformed() {
        let err = load(
            r#"{ "version": 1, "contexts": [ { "name": "C", "messages": [ { "source": "A" } ] } ] }"#,
        )
        .expect_err("should fail");
        assert!(err.is_structural());
        assert!(err.to_string().contains("translation"));
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = load("{\n  \"version\": 1,\n  \"contexts\": [\n}").expect_err("should fail");
        assert!(matches!(err, CatalogError::MalformedResource { line: Some(4), .. }));
    }
}
