// SPDX-License-Identifier: PMPL-1.0-or-later

//! ts-catalog: read-only translation tables for plugin user interfaces.
//!
//! A plugin ships its translated UI strings as a Qt Linguist TS document
//! (or the equivalent JSON catalog). This crate loads such a resource into
//! an immutable [`Table`] and answers lookups by `(context, source)`.
//!
//! Lookup never fails: when no usable translation exists the source string
//! is returned unchanged, so an untranslated UI still renders.
//!
//! ```
//! use ts_catalog::Table;
//!
//! let table = Table::load_str(r#"<TS version="2.1" language="ja_JP">
//!   <context><name>ConfigDialog</name>
//!     <message><source>Table</source><translation>テーブル</translation></message>
//!   </context></TS>"#).unwrap();
//!
//! assert_eq!(table.lookup("ConfigDialog", "Table"), "テーブル");
//! assert_eq!(table.lookup("ConfigDialog", "Name"), "Name");
//! assert!(ts_catalog::locale::is_valid_iso639_1("ja"));
//! ```

pub mod config;
pub mod diagnostics;
pub mod directory;
pub mod error;
pub mod format;
pub mod locale;
pub mod report;
pub mod table;
pub mod types;

pub use directory::{CatalogDir, CatalogFile};
pub use error::{CatalogError, LoadWarning, Result};
pub use format::ResourceFormat;
pub use locale::Locale;
pub use table::{LoadOptions, Table};
pub use types::{Entry, EntryId, Location, TranslationStatus};
