// SPDX-License-Identifier: PMPL-1.0-or-later

//! The localization table.
//!
//! A [`Table`] is built once from a resource and never changes afterwards.
//! Entries live in an arena indexed by [`EntryId`]; location hints are kept
//! in a parallel side list so the lookup path never touches them.
//!
//! Lookup is fail-open: a missing entry, an empty translation, or a retired
//! entry all resolve to the source string itself.

use crate::error::{CatalogError, LoadWarning, Result};
use crate::format::{self, ResourceFormat};
use crate::locale::Locale;
use crate::report::CatalogStats;
use crate::types::{Entry, EntryId, Location, RawMessage, ResourceHeader, TranslationStatus};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Knobs applied while loading a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Serve translations marked `unfinished`.
    pub include_unfinished: bool,
    /// Skip format detection.
    pub format: Option<ResourceFormat>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_unfinished: true,
            format: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    version: String,
    declared_language: Option<String>,
    locale: Option<Locale>,
    source_locale: Option<Locale>,
    entries: Vec<Entry>,
    origins: Vec<Vec<Location>>,
    // context -> source -> entries (one per disambiguation)
    index: HashMap<String, HashMap<String, Vec<EntryId>>>,
    contexts: Vec<String>,
    include_unfinished: bool,
    warnings: Vec<LoadWarning>,
}

impl Table {
    /// Load a resource with default options, detecting its format.
    pub fn load(resource: &[u8]) -> Result<Table> {
        Self::load_with(resource, &LoadOptions::default())
    }

    pub fn load_str(resource: &str) -> Result<Table> {
        Self::load(resource.as_bytes())
    }

    pub fn load_with(resource: &[u8], options: &LoadOptions) -> Result<Table> {
        format::read(resource, options.format, options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Table> {
        Self::from_path_with(path, &LoadOptions::default())
    }

    /// Load a file; the extension picks the format unless `options` names one.
    pub fn from_path_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let hint = options.format.or_else(|| ResourceFormat::from_path(path));
        format::read(&bytes, hint, options)
    }

    /// Translate `source_text` in `context`, falling back to `source_text`.
    ///
    /// Never fails. Only the entry without a disambiguation comment is
    /// considered; see [`Table::lookup_disambiguated`].
    pub fn lookup<'a>(&'a self, context: &str, source_text: &'a str) -> &'a str {
        self.find(context, source_text).unwrap_or(source_text)
    }

    /// Like [`Table::lookup`] for a specific disambiguation comment.
    ///
    /// When no servable entry carries that comment, the uncommented entry is
    /// tried before falling back to `source_text`.
    pub fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source_text: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        self.find_disambiguated(context, source_text, disambiguation)
            .unwrap_or(source_text)
    }

    /// The servable, non-empty translation, or `None` when lookup would fall
    /// back to the source.
    pub fn find(&self, context: &str, source_text: &str) -> Option<&str> {
        self.find_disambiguated(context, source_text, None)
    }

    pub fn find_disambiguated(
        &self,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> Option<&str> {
        let exact = self.served(context, source_text, disambiguation);
        if exact.is_some() || disambiguation.is_none() {
            return exact;
        }
        self.served(context, source_text, None)
    }

    fn served(&self, context: &str, source_text: &str, disambiguation: Option<&str>) -> Option<&str> {
        self.entry(context, source_text, disambiguation)
            .filter(|entry| self.serves(entry))
            .map(|entry| entry.translation.as_str())
    }

    /// Exact entry for a full key, regardless of status or emptiness.
    pub fn entry(
        &self,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> Option<&Entry> {
        self.index
            .get(context)?
            .get(source_text)?
            .iter()
            .map(|id| &self.entries[id.0])
            .find(|entry| entry.disambiguation.as_deref() == disambiguation)
    }

    /// Whether lookup would return this entry's translation.
    pub fn serves(&self, entry: &Entry) -> bool {
        if !entry.has_translation() || entry.status.is_retired() {
            return false;
        }
        self.include_unfinished || entry.status != TranslationStatus::Unfinished
    }

    /// All entries in resource order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_in<'a>(&'a self, context: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.context == context)
    }

    /// Context names in resource order.
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Location hints recorded for an entry.
    pub fn locations(&self, id: EntryId) -> &[Location] {
        self.origins.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// The `language` value exactly as the resource spelled it.
    pub fn declared_language(&self) -> Option<&str> {
        self.declared_language.as_deref()
    }

    pub fn source_locale(&self) -> Option<&Locale> {
        self.source_locale.as_ref()
    }

    pub fn format_version(&self) -> &str {
        &self.version
    }

    pub fn include_unfinished(&self) -> bool {
        self.include_unfinished
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// BLAKE3 digest of what lookup can return.
    ///
    /// Covers every servable `(context, source, disambiguation, translation)`
    /// tuple in key order, so two tables with equal fingerprints answer
    /// every lookup identically regardless of format or entry order.
    pub fn fingerprint(&self) -> String {
        let mut served: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|entry| self.serves(entry))
            .collect();
        served.sort_by(|a, b| {
            (&a.context, &a.source, &a.disambiguation).cmp(&(
                &b.context,
                &b.source,
                &b.disambiguation,
            ))
        });

        let mut hasher = blake3::Hasher::new();
        for entry in served {
            update_field(&mut hasher, &entry.context);
            update_field(&mut hasher, &entry.source);
            match &entry.disambiguation {
                Some(comment) => {
                    hasher.update(&[1]);
                    update_field(&mut hasher, comment);
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            update_field(&mut hasher, &entry.translation);
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(self)
    }
}

fn update_field(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Accumulates messages from a format reader into a [`Table`].
pub(crate) struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub(crate) fn new(header: ResourceHeader, options: &LoadOptions) -> Self {
        let mut builder = Self {
            table: Table {
                version: header.version,
                declared_language: header.language.clone(),
                locale: None,
                source_locale: header.source_language.as_deref().and_then(Locale::parse),
                entries: Vec::new(),
                origins: Vec::new(),
                index: HashMap::new(),
                contexts: Vec::new(),
                include_unfinished: options.include_unfinished,
                warnings: Vec::new(),
            },
        };

        match header.language.as_deref().map(str::trim) {
            None | Some("") => builder.warn(LoadWarning::MissingLanguage),
            Some(code) => {
                let locale = Locale::parse(code);
                if !locale.as_ref().map(Locale::is_known).unwrap_or(false) {
                    builder.warn(LoadWarning::UnknownLocale {
                        code: code.to_string(),
                    });
                }
                builder.table.locale = locale;
            }
        }

        builder
    }

    pub(crate) fn warn(&mut self, warning: LoadWarning) {
        warn!(%warning, "catalog load warning");
        self.table.warnings.push(warning);
    }

    /// Register a context so empty contexts still show up in order.
    pub(crate) fn begin_context(&mut self, name: &str) {
        if !self.table.index.contains_key(name) {
            self.table.index.insert(name.to_string(), HashMap::new());
            self.table.contexts.push(name.to_string());
        }
    }

    pub(crate) fn push(&mut self, context: &str, message: RawMessage) -> Result<()> {
        self.begin_context(context);
        let by_source = self
            .table
            .index
            .get_mut(context)
            .ok_or_else(|| CatalogError::malformed(format!("context '{}' vanished", context)))?;

        let existing = by_source.get(&message.source).and_then(|ids| {
            ids.iter()
                .copied()
                .find(|id| self.table.entries[id.0].disambiguation == message.disambiguation)
        });

        if let Some(id) = existing {
            let entry = &mut self.table.entries[id.0];
            if entry.translation != message.translation
                || entry.numerus_forms != message.numerus_forms
            {
                return Err(CatalogError::ConflictingTranslation {
                    context: context.to_string(),
                    source_text: message.source,
                });
            }
            if message.status.serve_rank() > entry.status.serve_rank() {
                entry.status = message.status;
            }
            let origins = &mut self.table.origins[id.0];
            for location in message.locations {
                if !origins.contains(&location) {
                    origins.push(location);
                }
            }
            return Ok(());
        }

        let id = EntryId(self.table.entries.len());
        by_source
            .entry(message.source.clone())
            .or_default()
            .push(id);

        let mut origins = Vec::with_capacity(message.locations.len());
        for location in message.locations {
            if !origins.contains(&location) {
                origins.push(location);
            }
        }
        self.table.origins.push(origins);
        self.table.entries.push(Entry {
            id,
            context: context.to_string(),
            source: message.source,
            disambiguation: message.disambiguation,
            translation: message.translation,
            numerus_forms: message.numerus_forms,
            status: message.status,
            extra_comment: message.extra_comment,
            translator_comment: message.translator_comment,
        });
        Ok(())
    }

    pub(crate) fn finish(self) -> Table {
        self.table
    }
}
