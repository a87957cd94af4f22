// SPDX-License-Identifier: PMPL-1.0-or-later

//! Converting between TS documents and JSON catalogs

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use ts_catalog::{LoadOptions, ResourceFormat, Table};

fn sample() -> Table {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/config_dialog_ja.ts");
    Table::from_path(path).expect("sample catalog should load")
}

#[test]
fn test_json_round_trip_preserves_lookups() {
    let table = sample();
    let json = ResourceFormat::Json.write(&table).expect("serializes");
    let reloaded = Table::load_str(&json).expect("json catalog loads");

    assert_eq!(reloaded.fingerprint(), table.fingerprint());
    assert_eq!(reloaded.len(), table.len());
    assert_eq!(reloaded.lookup("ConfigDialog", "File"), "ファイル");
    assert_eq!(reloaded.lookup("ConfigDialog", "+"), "+");
    assert_eq!(reloaded.declared_language(), Some("ja_JP"));
}

#[test]
fn test_json_keeps_locations() {
    let table = sample();
    let json = ResourceFormat::Json.write(&table).expect("serializes");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(value["version"], 1);
    let messages = value["contexts"][0]["messages"]
        .as_array()
        .expect("messages array");
    let seconds = messages
        .iter()
        .find(|message| message["source"] == " seconds")
        .expect("seconds message");
    assert_eq!(seconds["locations"][0]["line"], 496);
    assert_eq!(seconds["locations"][1]["line"], 523);
    assert!(seconds.get("status").is_none());
}

#[test]
fn test_json_back_to_ts() {
    let table = sample();
    let json = ResourceFormat::Json.write(&table).expect("serializes");
    let from_json = Table::load_str(&json).expect("json loads");
    let ts = ResourceFormat::Ts.write(&from_json).expect("writes ts");
    let from_ts = Table::load_str(&ts).expect("ts loads");
    assert_eq!(from_ts.fingerprint(), table.fingerprint());
}

#[test]
fn test_extension_drives_format() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("discovery_ja.json");
    fs::write(
        &path,
        r#"{ "version": 1, "language": "ja_JP", "contexts": [
            { "name": "ConfigDialog", "messages": [
                { "source": "Name", "translation": "名前" } ] } ] }"#,
    )
    .expect("write catalog");

    let table = Table::from_path(&path).expect("loads by extension");
    assert_eq!(table.lookup("ConfigDialog", "Name"), "名前");
}

#[test]
fn test_unfinished_status_survives_json() {
    let table = Table::load_str(
        r#"<TS version="2.1" language="ja_JP"><context><name>ConfigDialog</name>
        <message><source>Schema</source><translation type="unfinished">スキーマ</translation></message>
        </context></TS>"#,
    )
    .expect("loads");
    let json = ResourceFormat::Json.write(&table).expect("serializes");
    assert!(json.contains("\"status\": \"unfinished\""));

    let options = LoadOptions {
        include_unfinished: false,
        ..LoadOptions::default()
    };
    let strict = Table::load_with(json.as_bytes(), &options).expect("loads");
    assert_eq!(strict.lookup("ConfigDialog", "Schema"), "Schema");
}

#[test]
fn test_missing_path_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = Table::from_path(dir.path().join("absent.ts")).expect_err("missing file");
    assert!(matches!(err, ts_catalog::CatalogError::Io { .. }));
}
