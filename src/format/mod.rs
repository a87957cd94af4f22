// SPDX-License-Identifier: PMPL-1.0-or-later

//! Resource formats: Qt Linguist TS documents and JSON catalogs.

pub mod json;
pub mod ts;

use crate::error::{CatalogError, Result};
use crate::table::{LoadOptions, Table};
use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFormat {
    /// Qt Linguist XML (`.ts`)
    Ts,
    /// JSON catalog
    Json,
}

impl ResourceFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ts" | "xml" => Some(ResourceFormat::Ts),
            "json" => Some(ResourceFormat::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    /// Guess the format from the first meaningful character.
    pub fn sniff(text: &str) -> Option<Self> {
        match text.trim_start_matches('\u{feff}').trim_start().chars().next()? {
            '<' => Some(ResourceFormat::Ts),
            '{' => Some(ResourceFormat::Json),
            _ => None,
        }
    }

    pub fn write(&self, table: &Table) -> Result<String> {
        match self {
            ResourceFormat::Ts => Ok(ts::write(table)),
            ResourceFormat::Json => json::write(table),
        }
    }
}

/// Decode and parse a resource. `hint` skips detection.
pub(crate) fn read(
    bytes: &[u8],
    hint: Option<ResourceFormat>,
    options: &LoadOptions,
) -> Result<Table> {
    let text = decode(bytes)?;
    let format = match hint {
        Some(format) => format,
        None => ResourceFormat::sniff(&text).ok_or_else(|| {
            CatalogError::malformed("unrecognised resource: expected a TS document or a JSON catalog")
        })?,
    };

    let table = match format {
        ResourceFormat::Ts => ts::read(&text, options)?,
        ResourceFormat::Json => json::read(&text, options)?,
    };

    debug!(
        ?format,
        version = table.format_version(),
        contexts = table.contexts().len(),
        entries = table.len(),
        warnings = table.warnings().len(),
        "catalog loaded"
    );
    Ok(table)
}

fn declared_encoding() -> &'static Regex {
    static DECL: OnceLock<Regex> = OnceLock::new();
    DECL.get_or_init(|| {
        Regex::new(r#"^\s*<\?xml[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
            .expect("encoding declaration pattern is valid")
    })
}

/// Decode raw bytes to text.
///
/// A byte-order mark wins; otherwise the XML declaration's `encoding`
/// label; otherwise UTF-8. Invalid byte sequences are malformed input,
/// never replaced.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (sniff_declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| {
            CatalogError::malformed(format!("resource is not valid {}", encoding.name()))
        })
}

fn sniff_declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let head_len = bytes.len().min(256);
    let head = String::from_utf8_lossy(&bytes[..head_len]);
    let Some(captures) = declared_encoding().captures(&head) else {
        return Ok(None);
    };
    let label = &captures[1];
    Encoding::for_label(label.as_bytes())
        .map(Some)
        .ok_or_else(|| CatalogError::Encoding {
            label: label.to_string(),
        })
}
