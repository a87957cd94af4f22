// SPDX-License-Identifier: PMPL-1.0-or-later

//! Resolving a locale to a catalog file inside a plugin's i18n directory

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use ts_catalog::{CatalogDir, LoadOptions, Locale, ResourceFormat};

const MINIMAL_TS: &str = r#"<TS version="2.1" language="ja"><context><name>ConfigDialog</name>
<message><source>File</source><translation>ファイル</translation></message>
</context></TS>"#;

fn touch(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("write file");
}

fn locale(raw: &str) -> Locale {
    Locale::parse(raw).expect("valid locale")
}

#[test]
fn test_region_specific_file_preferred() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "discovery_ja.ts", MINIMAL_TS);
    touch(dir.path(), "discovery_ja_JP.ts", MINIMAL_TS);

    let catalog = CatalogDir::new(dir.path()).with_prefix("discovery");
    let file = catalog
        .resolve(&locale("ja_JP"))
        .expect("resolve")
        .expect("match");
    assert_eq!(file.path, dir.path().join("discovery_ja_JP.ts"));
}

#[test]
fn test_language_fallback() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "discovery_ja.ts", MINIMAL_TS);

    let catalog = CatalogDir::new(dir.path()).with_prefix("discovery");
    let file = catalog
        .resolve(&locale("ja-JP"))
        .expect("resolve")
        .expect("match");
    assert_eq!(file.locale.to_string(), "ja");
    assert_eq!(file.format, ResourceFormat::Ts);
}

#[test]
fn test_ts_preferred_over_json() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "discovery_ja.json", "{}");
    touch(dir.path(), "discovery_ja.ts", MINIMAL_TS);

    let file = CatalogDir::new(dir.path())
        .resolve(&locale("ja"))
        .expect("resolve")
        .expect("match");
    assert_eq!(file.format, ResourceFormat::Ts);
    assert_eq!(file.prefix, "discovery");
}

#[test]
fn test_no_match_is_none() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "discovery_ja.ts", MINIMAL_TS);
    touch(dir.path(), "README.md", "notes");

    let catalog = CatalogDir::new(dir.path());
    assert!(catalog.resolve(&locale("de_DE")).expect("resolve").is_none());
    assert_eq!(catalog.available().expect("list").len(), 1);
}

#[test]
fn test_prefix_filters_other_plugins() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "other_ja.ts", MINIMAL_TS);

    let catalog = CatalogDir::new(dir.path()).with_prefix("discovery");
    assert!(catalog.resolve(&locale("ja")).expect("resolve").is_none());
}

#[test]
fn test_load_resolved_table() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "discovery_ja.ts", MINIMAL_TS);

    let table = CatalogDir::new(dir.path())
        .with_prefix("discovery")
        .load(&locale("ja_JP"), &LoadOptions::default())
        .expect("load")
        .expect("table");
    assert_eq!(table.lookup("ConfigDialog", "File"), "ファイル");
}

#[test]
fn test_missing_directory_is_error() {
    let dir = TempDir::new().expect("tempdir");
    let catalog = CatalogDir::new(dir.path().join("absent"));
    assert!(catalog.available().is_err());
}

#[test]
fn test_underscored_prefix_without_configured_prefix() {
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "my_app_ja.ts", MINIMAL_TS);

    let catalog = CatalogDir::new(dir.path());
    let available = catalog.available().expect("list");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].prefix, "my_app");
    assert_eq!(available[0].locale.to_string(), "ja");

    let file = catalog
        .resolve(&locale("ja_JP"))
        .expect("resolve")
        .expect("match");
    assert_eq!(file.path, dir.path().join("my_app_ja.ts"));
}
