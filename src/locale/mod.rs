// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale identifiers as declared by catalog files.
//!
//! Catalogs spell their target as `ja_JP`, but hosts often hand us
//! environment-style values (`ja_JP.UTF-8`, `ja-JP`, `ja_JP@euro`). All of
//! these normalise to the same [`Locale`].

mod iso639;

pub use iso639::{is_valid_iso639_1, is_valid_region, language_name};

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Parse a locale identifier.
    ///
    /// Returns `None` only when the value has no usable language part; a
    /// well-shaped but unknown code (say `xx_YY`) still parses, and
    /// [`Locale::is_known`] reports whether it is recognised.
    pub fn parse(raw: &str) -> Option<Locale> {
        let mut normalized = raw.trim().replace('-', "_");
        if let Some(idx) = normalized.find('@') {
            normalized.truncate(idx);
        }
        if let Some(idx) = normalized.find('.') {
            normalized.truncate(idx);
        }

        let mut parts = normalized.split('_');
        let language = parts.next()?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }

        let mut locale = Locale {
            language: language.to_ascii_lowercase(),
            script: None,
            region: None,
        };

        for part in parts.filter(|part| !part.is_empty()) {
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                if locale.script.is_none() && locale.region.is_none() {
                    let mut script = part.to_ascii_lowercase();
                    script[..1].make_ascii_uppercase();
                    locale.script = Some(script);
                    continue;
                }
                return None;
            }
            if locale.region.is_some() {
                return None;
            }
            locale.region = Some(part.to_ascii_uppercase());
        }

        Some(locale)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// True when the language is an ISO 639-1 code and the region, if any,
    /// is well-shaped.
    pub fn is_known(&self) -> bool {
        is_valid_iso639_1(&self.language)
            && self.region.as_deref().map(is_valid_region).unwrap_or(true)
    }

    /// Identifiers to try when picking a resource for this locale, most
    /// specific first: `zh_Hant_TW`, `zh_TW`, `zh`.
    pub fn candidates(&self) -> Vec<String> {
        let mut out = vec![self.to_string()];
        if self.script.is_some() {
            if let Some(region) = &self.region {
                out.push(format!("{}_{}", self.language, region));
            }
        }
        if self.script.is_some() || self.region.is_some() {
            out.push(self.language.clone());
        }
        out
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(script) = &self.script {
            write!(f, "_{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "_{}", region)?;
        }
        Ok(())
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_form() {
        let locale = Locale::parse("ja_JP").expect("should parse");
        assert_eq!(locale.language(), "ja");
        assert_eq!(locale.region(), Some("JP"));
        assert!(locale.is_known());
        assert_eq!(locale.to_string(), "ja_JP");
    }

    #[test]
    fn normalises_environment_forms() {
        for raw in ["ja-JP", "ja_JP.UTF-8", "ja_jp@calendar", " JA_JP "] {
            let locale = Locale::parse(raw).expect("should parse");
            assert_eq!(locale.to_string(), "ja_JP", "input {:?}", raw);
        }
    }

    #[test]
    fn language_only() {
        let locale = Locale::parse("ja").expect("should parse");
        assert_eq!(locale.region(), None);
        assert_eq!(locale.candidates(), vec!["ja".to_string()]);
    }

    #[test]
    fn script_subtag() {
        let locale = Locale::parse("zh-hant-tw").expect("should parse");
        assert_eq!(locale.script(), Some("Hant"));
        assert_eq!(locale.to_string(), "zh_Hant_TW");
        assert_eq!(
            locale.candidates(),
            vec!["zh_Hant_TW".to_string(), "zh_TW".to_string(), "zh".to_string()]
        );
    }

    #[test]
    fn unknown_but_well_shaped() {
        let locale = Locale::parse("xx_YY").expect("should parse");
        assert!(!locale.is_known());
        let locale = Locale::parse("ja_JAPAN").expect("should parse");
        assert!(!locale.is_known());
    }

    #[test]
    fn garbage_rejected() {
        assert!(Locale::parse("").is_none());
        assert!(Locale::parse("_JP").is_none());
        assert!(Locale::parse("japanese").is_none());
        assert!(Locale::parse("j1").is_none());
        assert!(Locale::parse("ja_JP_US").is_none());
    }
}
