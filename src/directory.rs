// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog directories: pick the resource file for a locale.
//!
//! Plugins ship one file per locale next to each other, named
//! `<prefix>_<locale>.<ext>` (for example `i18n/discovery_ja.ts`). Given a
//! requested locale this module finds the most specific file available,
//! trying `ja_JP` before `ja`.

use crate::error::{CatalogError, Result};
use crate::format::ResourceFormat;
use crate::locale::Locale;
use crate::table::{LoadOptions, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A resource file found in a catalog directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub prefix: String,
    pub locale: Locale,
    pub format: ResourceFormat,
}

#[derive(Debug, Clone)]
pub struct CatalogDir {
    root: PathBuf,
    prefix: Option<String>,
}

impl CatalogDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix: None,
        }
    }

    /// Only consider files named `<prefix>_<locale>`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every recognisable catalog file directly inside the directory, sorted
    /// by file name.
    pub fn available(&self) -> Result<Vec<CatalogFile>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| CatalogError::Io {
                path: self.root.clone(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(format) = ResourceFormat::from_path(path) else {
                continue;
            };
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Some((prefix, locale)) = self.split_stem(stem) {
                files.push(CatalogFile {
                    path: path.to_path_buf(),
                    prefix,
                    locale,
                    format,
                });
            }
        }
        Ok(files)
    }

    /// The most specific file for `locale`, preferring TS over JSON when
    /// both exist for the same locale.
    pub fn resolve(&self, locale: &Locale) -> Result<Option<CatalogFile>> {
        let available = self.available()?;
        for candidate in locale.candidates() {
            let mut matches: Vec<&CatalogFile> = available
                .iter()
                .filter(|file| file.locale.to_string() == candidate)
                .collect();
            matches.sort_by_key(|file| match file.format {
                ResourceFormat::Ts => 0,
                ResourceFormat::Json => 1,
            });
            if let Some(file) = matches.first() {
                debug!(
                    requested = %locale,
                    resolved = %file.path.display(),
                    "catalog resolved"
                );
                return Ok(Some((*file).clone()));
            }
        }
        debug!(requested = %locale, root = %self.root.display(), "no catalog for locale");
        Ok(None)
    }

    /// Resolve and load in one step. `Ok(None)` means no file matched.
    pub fn load(&self, locale: &Locale, options: &LoadOptions) -> Result<Option<Table>> {
        match self.resolve(locale)? {
            Some(file) => {
                let options = LoadOptions {
                    format: options.format.or(Some(file.format)),
                    ..options.clone()
                };
                Table::from_path_with(&file.path, &options).map(Some)
            }
            None => Ok(None),
        }
    }

    fn split_stem(&self, stem: &str) -> Option<(String, Locale)> {
        if let Some(prefix) = &self.prefix {
            let rest = stem.strip_prefix(prefix.as_str())?.strip_prefix('_')?;
            return Locale::parse(rest).map(|locale| (prefix.clone(), locale));
        }

        // Whole stem first, then every `_` split from the left. A split whose
        // language is a real ISO 639-1 code beats one that only parses.
        let splits = std::iter::once(("", stem)).chain(
            stem.match_indices('_')
                .map(|(idx, _)| (&stem[..idx], &stem[idx + 1..])),
        );
        let mut fallback = None;
        for (prefix, rest) in splits {
            let Some(locale) = Locale::parse(rest) else {
                continue;
            };
            if locale.is_known() {
                return Some((prefix.to_string(), locale));
            }
            if fallback.is_none() {
                fallback = Some((prefix.to_string(), locale));
            }
        }
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_with_prefix() {
        let dir = CatalogDir::new("i18n").with_prefix("discovery");
        let (prefix, locale) = dir.split_stem("discovery_ja_JP").expect("should split");
        assert_eq!(prefix, "discovery");
        assert_eq!(locale.to_string(), "ja_JP");
        assert!(dir.split_stem("other_ja").is_none());
    }

    #[test]
    fn split_without_prefix() {
        let dir = CatalogDir::new("i18n");
        let (prefix, locale) = dir.split_stem("my_plugin_ja").expect("should split");
        assert_eq!(prefix, "my_plugin");
        assert_eq!(locale.to_string(), "ja");

        let (prefix, locale) = dir.split_stem("de_DE").expect("should split");
        assert_eq!(prefix, "");
        assert_eq!(locale.to_string(), "de_DE");

        assert!(dir.split_stem("README").is_none());
    }

    #[test]
    fn split_prefers_known_language() {
        let dir = CatalogDir::new("i18n");
        let (prefix, locale) = dir.split_stem("my_app_ja").expect("should split");
        assert_eq!(prefix, "my_app");
        assert_eq!(locale.to_string(), "ja");

        let (prefix, locale) = dir.split_stem("qgis_plugin_pt_BR").expect("should split");
        assert_eq!(prefix, "qgis_plugin");
        assert_eq!(locale.to_string(), "pt_BR");

        // Nothing known: the leftmost parseable split still counts.
        let (prefix, locale) = dir.split_stem("tool_xx").expect("should split");
        assert_eq!(prefix, "tool");
        assert_eq!(locale.to_string(), "xx");
    }
}
