// SPDX-License-Identifier: PMPL-1.0-or-later

//! Health checks for a single catalog resource.

use crate::format::ts::SUPPORTED_VERSIONS;
use crate::format::ResourceFormat;
use crate::table::{LoadOptions, Table};
use crate::types::TranslationStatus;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Print a check report for `path`; fails when any check is an error.
pub fn run_catalog_check(path: &Path, options: &LoadOptions) -> Result<()> {
    println!("ts-catalog check: {}", path.display());

    let checks = check_catalog(path, options);

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks
        .iter()
        .any(|entry| matches!(entry.level, Level::Error))
    {
        Err(anyhow!("{} did not pass the catalog check", path.display()))
    } else {
        Ok(())
    }
}

pub fn check_catalog(path: &Path, options: &LoadOptions) -> Vec<Diagnostic> {
    let mut checks = Vec::new();

    let table = match Table::from_path_with(path, options) {
        Ok(table) => table,
        Err(err) => {
            checks.push(Diagnostic::error("load", err.to_string()));
            return checks;
        }
    };
    let format = options
        .format
        .or_else(|| ResourceFormat::from_path(path))
        .unwrap_or(ResourceFormat::Ts);
    checks.push(Diagnostic::ok(
        "load",
        format!(
            "{} entries in {} contexts",
            table.len(),
            table.contexts().len()
        ),
    ));

    checks.push(check_version(&table, format));
    checks.push(check_locale(&table));

    for warning in table.warnings() {
        checks.push(Diagnostic::warning("load warning", warning.to_string()));
    }

    checks.push(count_check(
        "empty translations",
        &table,
        |_, entry| !entry.status.is_retired() && !entry.has_translation(),
        "pass through to the source",
    ));
    checks.push(count_check(
        "unfinished",
        &table,
        |_, entry| entry.status == TranslationStatus::Unfinished,
        if table.include_unfinished() {
            "served as-is"
        } else {
            "fall back to the source"
        },
    ));
    checks.push(count_check(
        "obsolete",
        &table,
        |_, entry| entry.status.is_retired(),
        "kept for translator memory only",
    ));

    checks
}

fn check_version(table: &Table, format: ResourceFormat) -> Diagnostic {
    match format {
        ResourceFormat::Ts if SUPPORTED_VERSIONS.contains(&table.format_version()) => {
            Diagnostic::ok("format version", format!("TS {}", table.format_version()))
        }
        ResourceFormat::Ts => Diagnostic::warning(
            "format version",
            format!("TS {} assumed", table.format_version()),
        ),
        ResourceFormat::Json => {
            Diagnostic::ok("format version", format!("JSON {}", table.format_version()))
        }
    }
}

fn check_locale(table: &Table) -> Diagnostic {
    match (table.locale(), table.declared_language()) {
        (Some(locale), _) if locale.is_known() => {
            Diagnostic::ok("locale", format!("{} ({})", locale, locale_label(table)))
        }
        (Some(locale), _) => Diagnostic::warning(
            "locale",
            format!("{} is not a known language code", locale),
        ),
        (None, Some(raw)) => Diagnostic::warning(
            "locale",
            format!("'{}' is not a locale identifier", raw),
        ),
        (None, None) => Diagnostic::warning("locale", "no language declared".to_string()),
    }
}

fn locale_label(table: &Table) -> &'static str {
    table
        .locale()
        .and_then(|locale| crate::locale::language_name(locale.language()))
        .unwrap_or("unnamed")
}

fn count_check(
    label: &'static str,
    table: &Table,
    predicate: impl Fn(&Table, &crate::types::Entry) -> bool,
    note: &str,
) -> Diagnostic {
    let matching: Vec<_> = table
        .entries()
        .iter()
        .filter(|entry| predicate(table, entry))
        .collect();
    if matching.is_empty() {
        return Diagnostic::ok(label, "none".to_string());
    }
    let sample: Vec<String> = matching
        .iter()
        .take(3)
        .map(|entry| format!("{}::{:?}", entry.context, entry.source))
        .collect();
    let more = if matching.len() > sample.len() {
        format!(", +{} more", matching.len() - sample.len())
    } else {
        String::new()
    };
    Diagnostic::warning(
        label,
        format!("{} ({}): {}{}", matching.len(), note, sample.join(", "), more),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub label: &'static str,
    pub level: Level,
    pub detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:20} {}", self.level.tag(), self.label, self.detail);
    }
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("write resource");
        path
    }

    #[test]
    fn clean_catalog_has_no_errors() {
        let dir = TempDir::new().expect("tempdir");
        let path = write(
            &dir,
            "discovery_ja.ts",
            r#"<TS version="2.1" language="ja_JP"><context><name>ConfigDialog</name>
            <message><source>Table</source><translation>テーブル</translation></message>
            </context></TS>"#,
        );
        let checks = check_catalog(&path, &LoadOptions::default());
        assert!(checks.iter().all(|check| check.level == Level::Ok));
        assert!(run_catalog_check(&path, &LoadOptions::default()).is_ok());
    }

    #[test]
    fn empty_and_obsolete_are_warnings() {
        let dir = TempDir::new().expect("tempdir");
        let path = write(
            &dir,
            "c.ts",
            r#"<TS version="2.1" language="ja_JP"><context><name>C</name>
            <message><source>-</source><translation></translation></message>
            <message><source>Old</source><translation type="obsolete">古い</translation></message>
            </context></TS>"#,
        );
        let checks = check_catalog(&path, &LoadOptions::default());
        let warned: Vec<_> = checks
            .iter()
            .filter(|check| check.level == Level::Warn)
            .map(|check| check.label)
            .collect();
        assert_eq!(warned, vec!["empty translations", "obsolete"]);
    }

    #[test]
    fn broken_catalog_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write(&dir, "broken.ts", "<TS version=\"2.1\"><context>");
        let checks = check_catalog(&path, &LoadOptions::default());
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].level, Level::Error);
        assert!(run_catalog_check(&path, &LoadOptions::default()).is_err());
    }
}
