// SPDX-License-Identifier: PMPL-1.0-or-later

//! Qt Linguist TS reader and writer.
//!
//! The reader walks the event stream once, keeping a stack of open
//! elements. Messages are buffered per context and handed to the table
//! builder when the context closes, so a `<name>` that follows its messages
//! still works. Anything structurally wrong aborts the whole load.

use crate::error::{CatalogError, LoadWarning, Result};
use crate::table::{LoadOptions, Table, TableBuilder};
use crate::types::{Location, RawMessage, ResourceHeader, TranslationStatus};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

pub const SUPPORTED_VERSIONS: &[&str] = &["1.1", "2.0", "2.1"];
pub const CURRENT_VERSION: &str = "2.1";

/// Where character data inside an element goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    ContextName,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root,
    Context,
    Message,
    NumerusTranslation,
    VariantTranslation,
    Text(Slot),
    Skip,
}

struct Open {
    frame: Frame,
    tag: String,
}

#[derive(Default)]
struct ContextState {
    name: Option<String>,
    line: usize,
    messages: Vec<RawMessage>,
    current_file: Option<String>,
    current_lines: HashMap<String, i64>,
}

struct MessageState {
    raw: RawMessage,
    line: usize,
    numerus: bool,
    has_source: bool,
    has_translation: bool,
    status_attr: Option<String>,
    seen_length_variant: bool,
}

pub(crate) fn read(text: &str, options: &LoadOptions) -> Result<Table> {
    TsParser::new(text, options).run()
}

/// Maps byte offsets to 1-based line numbers.
///
/// Offsets arrive in document order, so each call only scans the bytes
/// since the previous one. A smaller offset restarts from the top.
struct LineCounter<'t> {
    text: &'t str,
    offset: usize,
    line: usize,
}

impl<'t> LineCounter<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        let end = offset.min(self.text.len());
        if end < self.offset {
            self.offset = 0;
            self.line = 1;
        }
        self.line += self.text.as_bytes()[self.offset..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.offset = end;
        self.line
    }
}

struct TsParser<'t> {
    text: &'t str,
    lines: LineCounter<'t>,
    options: &'t LoadOptions,
    builder: Option<TableBuilder>,
    stack: Vec<Open>,
    context: Option<ContextState>,
    message: Option<MessageState>,
    root_closed: bool,
}

impl<'t> TsParser<'t> {
    fn new(text: &'t str, options: &'t LoadOptions) -> Self {
        Self {
            text,
            lines: LineCounter::new(text),
            options,
            builder: None,
            stack: Vec::new(),
            context: None,
            message: None,
            root_closed: false,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        self.lines.line_at(offset)
    }

    fn run(mut self) -> Result<Table> {
        let mut reader = Reader::from_str(self.text);

        loop {
            let offset = reader.buffer_position() as usize;
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let line = self.line_at(reader.error_position() as usize);
                    return Err(CatalogError::malformed_at(line, format!("invalid XML: {}", err)));
                }
            };
            let line = self.line_at(offset);

            match event {
                Event::Start(element) => self.open(&element, line)?,
                Event::Empty(element) => {
                    self.open(&element, line)?;
                    self.close(line)?;
                }
                Event::End(_) => self.close(line)?,
                Event::Text(text) => {
                    let value = text.unescape().map_err(|err| {
                        CatalogError::malformed_at(line, format!("bad character data: {}", err))
                    })?;
                    self.characters(&value, line)?;
                }
                Event::CData(data) => {
                    let raw = data.into_inner();
                    let value = std::str::from_utf8(&raw).map_err(|err| {
                        CatalogError::malformed_at(line, format!("bad CDATA section: {}", err))
                    })?;
                    self.characters(value, line)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = self.stack.pop() {
            let line = self.line_at(self.text.len());
            return Err(CatalogError::malformed_at(
                line,
                format!("unexpected end of document inside <{}>", open.tag),
            ));
        }

        self.builder
            .map(TableBuilder::finish)
            .ok_or_else(|| CatalogError::malformed("missing root element <TS>"))
    }

    fn open(&mut self, element: &BytesStart<'_>, line: usize) -> Result<()> {
        let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let parent = self.stack.last().map(|open| open.frame);

        let frame = match parent {
            None => {
                if self.root_closed {
                    return Err(CatalogError::malformed_at(
                        line,
                        format!("unexpected <{}> after the root element", tag),
                    ));
                }
                if tag != "TS" {
                    return Err(CatalogError::malformed_at(
                        line,
                        format!("root element must be <TS>, found <{}>", tag),
                    ));
                }
                self.begin_document(element, line)?;
                Frame::Root
            }
            Some(Frame::Root) => match tag.as_str() {
                "context" => {
                    self.context = Some(ContextState {
                        line,
                        ..ContextState::default()
                    });
                    Frame::Context
                }
                _ => Frame::Skip,
            },
            Some(Frame::Context) => match tag.as_str() {
                "name" => {
                    if let Some(context) = self.context.as_mut() {
                        context.name = Some(String::new());
                    }
                    Frame::Text(Slot::ContextName)
                }
                "message" => {
                    let numerus = attribute(element, b"numerus", line)?.as_deref() == Some("yes");
                    self.message = Some(MessageState {
                        raw: RawMessage::default(),
                        line,
                        numerus,
                        has_source: false,
                        has_translation: false,
                        status_attr: None,
                        seen_length_variant: false,
                    });
                    Frame::Message
                }
                _ => Frame::Skip,
            },
            Some(Frame::Message) => self.open_in_message(element, &tag, line)?,
            Some(Frame::NumerusTranslation) => match tag.as_str() {
                "numerusform" => {
                    if let Some(message) = self.message.as_mut() {
                        message.raw.numerus_forms.push(String::new());
                    }
                    Frame::Text(Slot::NumerusForm)
                }
                _ => Frame::Skip,
            },
            Some(Frame::Text(slot)) => match tag.as_str() {
                "byte" => {
                    let value = attribute(element, b"value", line)?.ok_or_else(|| {
                        CatalogError::malformed_at(line, "<byte> without a value attribute")
                    })?;
                    let ch = decode_byte(&value).ok_or_else(|| {
                        CatalogError::malformed_at(line, format!("invalid <byte> value '{}'", value))
                    })?;
                    self.append(slot, ch.encode_utf8(&mut [0; 4]));
                    Frame::Skip
                }
                _ => Frame::Skip,
            },
            // Only the first (longest) length variant is kept.
            Some(Frame::VariantTranslation) => match (tag.as_str(), self.message.as_mut()) {
                ("lengthvariant", Some(message)) if !message.seen_length_variant => {
                    message.seen_length_variant = true;
                    Frame::Text(Slot::Translation)
                }
                _ => Frame::Skip,
            },
            Some(Frame::Skip) => Frame::Skip,
        };

        self.stack.push(Open { frame, tag });
        Ok(())
    }

    fn open_in_message(&mut self, element: &BytesStart<'_>, tag: &str, line: usize) -> Result<Frame> {
        let frame = match tag {
            "source" => {
                if let Some(message) = self.message.as_mut() {
                    message.has_source = true;
                }
                Frame::Text(Slot::Source)
            }
            "comment" => {
                if let Some(message) = self.message.as_mut() {
                    message.raw.disambiguation = Some(String::new());
                }
                Frame::Text(Slot::Comment)
            }
            "extracomment" => {
                if let Some(message) = self.message.as_mut() {
                    message.raw.extra_comment = Some(String::new());
                }
                Frame::Text(Slot::ExtraComment)
            }
            "translatorcomment" => {
                if let Some(message) = self.message.as_mut() {
                    message.raw.translator_comment = Some(String::new());
                }
                Frame::Text(Slot::TranslatorComment)
            }
            "location" => {
                let filename = attribute(element, b"filename", line)?;
                let line_attr = attribute(element, b"line", line)?;
                let location = self.resolve_location(filename, line_attr, line)?;
                if let Some(message) = self.message.as_mut() {
                    message.raw.locations.push(location);
                }
                Frame::Skip
            }
            "translation" => {
                let status_attr = attribute(element, b"type", line)?;
                let variants = attribute(element, b"variants", line)?.as_deref() == Some("yes");
                let numerus = match self.message.as_mut() {
                    Some(message) => {
                        message.has_translation = true;
                        message.status_attr = status_attr;
                        message.numerus
                    }
                    None => false,
                };
                if numerus {
                    Frame::NumerusTranslation
                } else if variants {
                    Frame::VariantTranslation
                } else {
                    Frame::Text(Slot::Translation)
                }
            }
            _ => Frame::Skip,
        };
        Ok(frame)
    }

    fn begin_document(&mut self, element: &BytesStart<'_>, line: usize) -> Result<()> {
        let version = attribute(element, b"version", line)?;
        let language = attribute(element, b"language", line)?;
        let source_language = attribute(element, b"sourcelanguage", line)?;

        let (version, assumed) = match version {
            Some(version) if SUPPORTED_VERSIONS.contains(&version.as_str()) => (version, false),
            Some(version) => {
                return Err(CatalogError::unsupported_version(version, SUPPORTED_VERSIONS))
            }
            None => (CURRENT_VERSION.to_string(), true),
        };

        let header = ResourceHeader {
            version,
            language,
            source_language,
        };
        let mut builder = TableBuilder::new(header, self.options);
        if assumed {
            builder.warn(LoadWarning::MissingVersion {
                assumed: CURRENT_VERSION.to_string(),
            });
        }
        self.builder = Some(builder);
        Ok(())
    }

    /// Apply relative `filename`/`line` semantics within the current context.
    fn resolve_location(
        &mut self,
        filename: Option<String>,
        line_attr: Option<String>,
        line: usize,
    ) -> Result<Location> {
        let context = self
            .context
            .as_mut()
            .ok_or_else(|| CatalogError::malformed_at(line, "<location> outside a context"))?;

        let filename = match filename {
            Some(filename) => filename,
            None => context.current_file.clone().ok_or_else(|| {
                CatalogError::malformed_at(line, "<location> without filename and no previous file")
            })?,
        };
        context.current_file = Some(filename.clone());

        let Some(raw) = line_attr else {
            return Ok(Location::new(filename, None));
        };
        let raw = raw.trim();
        let invalid = || CatalogError::malformed_at(line, format!("invalid location line '{}'", raw));

        let value = if raw.starts_with('+') || raw.starts_with('-') {
            let offset: i64 = raw.parse().map_err(|_| invalid())?;
            context.current_lines.get(&filename).copied().unwrap_or(0) + offset
        } else {
            raw.parse::<i64>().map_err(|_| invalid())?
        };
        let number = u32::try_from(value).map_err(|_| invalid())?;
        context.current_lines.insert(filename.clone(), value);
        Ok(Location::new(filename, Some(number)))
    }

    fn characters(&mut self, value: &str, line: usize) -> Result<()> {
        match self.stack.last().map(|open| open.frame) {
            Some(Frame::Text(slot)) => self.append(slot, value),
            None if !value.trim().is_empty() => {
                return Err(CatalogError::malformed_at(
                    line,
                    "text outside the root element",
                ))
            }
            _ => {}
        }
        Ok(())
    }

    fn append(&mut self, slot: Slot, value: &str) {
        let target = match slot {
            Slot::ContextName => self.context.as_mut().and_then(|c| c.name.as_mut()),
            Slot::Source => self.message.as_mut().map(|m| &mut m.raw.source),
            Slot::Comment => self
                .message
                .as_mut()
                .and_then(|m| m.raw.disambiguation.as_mut()),
            Slot::ExtraComment => self
                .message
                .as_mut()
                .and_then(|m| m.raw.extra_comment.as_mut()),
            Slot::TranslatorComment => self
                .message
                .as_mut()
                .and_then(|m| m.raw.translator_comment.as_mut()),
            Slot::Translation => self.message.as_mut().map(|m| &mut m.raw.translation),
            Slot::NumerusForm => self
                .message
                .as_mut()
                .and_then(|m| m.raw.numerus_forms.last_mut()),
        };
        if let Some(target) = target {
            target.push_str(value);
        }
    }

    fn close(&mut self, line: usize) -> Result<()> {
        let open = self
            .stack
            .pop()
            .ok_or_else(|| CatalogError::malformed_at(line, "closing tag without an open element"))?;

        match open.frame {
            Frame::Message => self.finish_message()?,
            Frame::Context => self.finish_context()?,
            Frame::Root => self.root_closed = true,
            _ => {}
        }
        Ok(())
    }

    fn finish_message(&mut self) -> Result<()> {
        let Some(mut message) = self.message.take() else {
            return Ok(());
        };
        if !message.has_source {
            return Err(CatalogError::malformed_at(
                message.line,
                "<message> without <source>",
            ));
        }
        if !message.has_translation {
            return Err(CatalogError::malformed_at(
                message.line,
                format!("<message> '{}' without <translation>", message.raw.source),
            ));
        }

        if message.numerus {
            message.raw.translation = message.raw.numerus_forms.first().cloned().unwrap_or_default();
        }

        let value = message.status_attr.unwrap_or_default();
        message.raw.status = match TranslationStatus::parse(&value) {
            Some(status) => status,
            None => {
                if let Some(builder) = self.builder.as_mut() {
                    builder.warn(LoadWarning::UnknownTranslationType {
                        value,
                        source_text: message.raw.source.clone(),
                    });
                }
                TranslationStatus::Finished
            }
        };

        if let Some(context) = self.context.as_mut() {
            context.messages.push(message.raw);
        }
        Ok(())
    }

    fn finish_context(&mut self) -> Result<()> {
        let Some(context) = self.context.take() else {
            return Ok(());
        };
        let name = context
            .name
            .ok_or_else(|| CatalogError::malformed_at(context.line, "<context> without <name>"))?;
        let builder = self
            .builder
            .as_mut()
            .ok_or_else(|| CatalogError::malformed_at(context.line, "<context> outside <TS>"))?;

        builder.begin_context(&name);
        for message in context.messages {
            builder.push(&name, message)?;
        }
        Ok(())
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8], line: usize) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr
            .map_err(|err| CatalogError::malformed_at(line, format!("bad attribute: {}", err)))?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|err| {
                CatalogError::malformed_at(line, format!("bad attribute value: {}", err))
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// `<byte value="x1b"/>` or `<byte value="27"/>`.
fn decode_byte(value: &str) -> Option<char> {
    let code = match value.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

/// Escape character data, spelling control characters as `<byte>` elements.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut plain = String::new();
    for ch in value.chars() {
        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            out.push_str(&escape(plain.as_str()));
            plain.clear();
            out.push_str(&format!("<byte value=\"x{:x}\"/>", ch as u32));
        } else {
            plain.push(ch);
        }
    }
    out.push_str(&escape(plain.as_str()));
    out
}

/// Serialize a table as a TS 2.1 document with absolute locations.
pub fn write(table: &Table) -> String {
    let mut lines = Vec::new();
    lines.push("<?xml version=\"1.0\" encoding=\"utf-8\"?>".to_string());
    lines.push("<!DOCTYPE TS>".to_string());

    let mut root = format!("<TS version=\"{}\"", CURRENT_VERSION);
    if let Some(language) = table.declared_language() {
        root.push_str(&format!(" language=\"{}\"", escape(language)));
    }
    if let Some(source) = table.source_locale() {
        root.push_str(&format!(" sourcelanguage=\"{}\"", source));
    }
    root.push('>');
    lines.push(root);

    for context in table.contexts() {
        lines.push("<context>".to_string());
        lines.push(format!("    <name>{}</name>", escape_text(context)));
        for entry in table.entries_in(context) {
            if entry.is_numerus() {
                lines.push("    <message numerus=\"yes\">".to_string());
            } else {
                lines.push("    <message>".to_string());
            }
            for location in table.locations(entry.id) {
                let mut tag = format!(
                    "        <location filename=\"{}\"",
                    escape(location.filename.as_str())
                );
                if let Some(line) = location.line {
                    tag.push_str(&format!(" line=\"{}\"", line));
                }
                tag.push_str("/>");
                lines.push(tag);
            }
            lines.push(format!("        <source>{}</source>", escape_text(&entry.source)));
            if let Some(comment) = &entry.disambiguation {
                lines.push(format!("        <comment>{}</comment>", escape_text(comment)));
            }
            if let Some(comment) = &entry.extra_comment {
                lines.push(format!(
                    "        <extracomment>{}</extracomment>",
                    escape_text(comment)
                ));
            }
            if let Some(comment) = &entry.translator_comment {
                lines.push(format!(
                    "        <translatorcomment>{}</translatorcomment>",
                    escape_text(comment)
                ));
            }

            let open = match entry.status.as_attribute() {
                Some(kind) => format!("<translation type=\"{}\">", kind),
                None => "<translation>".to_string(),
            };
            if entry.is_numerus() {
                lines.push(format!("        {}", open));
                for form in &entry.numerus_forms {
                    lines.push(format!(
                        "            <numerusform>{}</numerusform>",
                        escape_text(form)
                    ));
                }
                lines.push("        </translation>".to_string());
            } else {
                lines.push(format!(
                    "        {}{}</translation>",
                    open,
                    escape_text(&entry.translation)
                ));
            }
            lines.push("    </message>".to_string());
        }
        lines.push("</context>".to_string());
    }
    lines.push("</TS>".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
