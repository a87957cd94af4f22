// SPDX-License-Identifier: PMPL-1.0-or-later

//! Settings file for the command-line tool.

use crate::directory::CatalogDir;
use crate::locale::Locale;
use crate::table::LoadOptions;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ts-catalog.yaml";
pub const LOCALE_ENV: &str = "TS_CATALOG_LOCALE";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub default_locale: Option<String>,
    #[serde(default)]
    pub include_unfinished: Option<bool>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json settings {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml settings {}", path.display())),
            _ => Err(anyhow!(
                "unsupported settings extension for {}",
                path.display()
            )),
        }
    }

    /// Load `path` if given, else `ts-catalog.yaml` in the working directory
    /// if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            include_unfinished: self.include_unfinished.unwrap_or(true),
            ..LoadOptions::default()
        }
    }

    /// Requested locale: explicit value, then `TS_CATALOG_LOCALE`, then the
    /// configured default.
    pub fn locale(&self, explicit: Option<&str>) -> Result<Locale> {
        let env_value = env::var(LOCALE_ENV).ok().filter(|v| !v.trim().is_empty());
        let raw = explicit
            .map(str::to_string)
            .or(env_value)
            .or_else(|| self.default_locale.clone())
            .ok_or_else(|| {
                anyhow!(
                    "no locale given (pass one, set {} or default_locale)",
                    LOCALE_ENV
                )
            })?;
        Locale::parse(&raw).ok_or_else(|| anyhow!("'{}' is not a locale identifier", raw))
    }

    pub fn catalog_dir(&self, dir: Option<&Path>, prefix: Option<&str>) -> CatalogDir {
        let root = dir
            .map(Path::to_path_buf)
            .or_else(|| self.catalog_dir.clone())
            .unwrap_or_else(|| PathBuf::from("i18n"));
        let catalog = CatalogDir::new(root);
        match prefix.map(str::to_string).or_else(|| self.prefix.clone()) {
            Some(prefix) => catalog.with_prefix(prefix),
            None => catalog,
        }
    }
}
