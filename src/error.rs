// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error and warning types for catalog loading.
//!
//! Loading is all-or-nothing: any [`CatalogError`] means no table was
//! produced. [`LoadWarning`]s are non-fatal findings attached to a loaded
//! table.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The resource is not structurally well-formed.
    #[error("malformed resource{}: {reason}", line_suffix(.line))]
    MalformedResource { line: Option<usize>, reason: String },

    /// The resource declares a schema version this crate does not read.
    #[error("unsupported catalog version '{found}' (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },

    /// The same key appears twice with different translations.
    #[error("conflicting translations for '{source_text}' in context '{context}'")]
    ConflictingTranslation {
        context: String,
        source_text: String,
    },

    /// The declared character set is not one encoding_rs knows.
    #[error("unknown character encoding '{label}'")]
    Encoding { label: String },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl CatalogError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResource {
            line: None,
            reason: reason.into(),
        }
    }

    pub fn malformed_at(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedResource {
            line: Some(line),
            reason: reason.into(),
        }
    }

    pub fn unsupported_version(found: impl Into<String>, supported: &[&str]) -> Self {
        Self::UnsupportedVersion {
            found: found.into(),
            supported: supported.join(", "),
        }
    }

    /// True for every variant that describes a broken resource rather than
    /// an environment problem.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedResource { .. } | Self::ConflictingTranslation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Non-fatal findings produced while loading a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// The declared target locale is not a recognised language/region pair.
    UnknownLocale { code: String },
    /// The resource does not declare a target locale at all.
    MissingLanguage,
    /// The resource does not declare a schema version; the newest was assumed.
    MissingVersion { assumed: String },
    /// A `<translation type="...">` value this crate does not recognise.
    UnknownTranslationType { value: String, source_text: String },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::UnknownLocale { code } => {
                write!(f, "declared locale '{}' is not recognised", code)
            }
            LoadWarning::MissingLanguage => write!(f, "resource declares no target language"),
            LoadWarning::MissingVersion { assumed } => {
                write!(f, "resource declares no version; assuming {}", assumed)
            }
            LoadWarning::UnknownTranslationType { value, source_text } => write!(
                f,
                "unknown translation type '{}' on '{}'; treated as finished",
                value, source_text
            ),
        }
    }
}
