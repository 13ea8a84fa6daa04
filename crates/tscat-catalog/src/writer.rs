//! Catalog writer
//!
//! Emits the same layout the Qt tools produce: XML declaration, doctype, a
//! `TS` root and four-space indentation. Text is written inline, so loading
//! the output again yields an identical [`Catalog`].

use crate::catalog::{Catalog, Location, Message, Translation};
use crate::error::{CatalogError, CatalogResult};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tracing::{debug, info};

const INDENT: &str = "    ";

impl Catalog {
    /// Serialize the catalog to `.ts` markup
    pub fn to_ts_string(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str("<!DOCTYPE TS>\n");

        out.push_str("<TS");
        push_attribute(&mut out, "version", self.version());
        push_attribute(&mut out, "language", self.language());
        push_attribute(&mut out, "sourcelanguage", self.source_language());
        out.push_str(">\n");

        for context in self.contexts() {
            out.push_str("<context>\n");
            push_element(&mut out, 1, "name", context.name());
            for message in context.messages() {
                write_message(&mut out, message);
            }
            out.push_str("</context>\n");
        }

        out.push_str("</TS>\n");
        out
    }

    /// Write the catalog to `path`, replacing the file atomically
    pub fn save(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        debug!("Writing catalog to {:?}", path);
        let mut file = tempfile::NamedTempFile::new_in(directory)?;
        file.write_all(self.to_ts_string().as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path)
            .map_err(|e| CatalogError::IoError(e.error))?;

        info!(
            "Saved catalog with {} messages to {:?}",
            self.message_count(),
            path
        );
        Ok(())
    }
}

fn write_message(out: &mut String, message: &Message) {
    out.push_str(INDENT);
    out.push_str("<message");
    if message.translation().is_plural() {
        out.push_str(" numerus=\"yes\"");
    }
    out.push_str(">\n");

    for location in message.locations() {
        write_location(out, location);
    }
    push_element(out, 2, "source", message.source());
    if let Some(comment) = message.comment() {
        push_element(out, 2, "comment", comment);
    }
    if let Some(comment) = message.extra_comment() {
        push_element(out, 2, "extracomment", comment);
    }
    if let Some(comment) = message.translator_comment() {
        push_element(out, 2, "translatorcomment", comment);
    }

    out.push_str(&INDENT.repeat(2));
    out.push_str("<translation");
    push_attribute(out, "type", message.status().type_attribute());
    out.push('>');
    match message.translation() {
        Translation::Single(text) => push_text(out, text),
        Translation::Plural(forms) if forms.is_empty() => {}
        Translation::Plural(forms) => {
            out.push('\n');
            for form in forms {
                push_element(out, 3, "numerusform", form);
            }
            out.push_str(&INDENT.repeat(2));
        }
    }
    out.push_str("</translation>\n");

    out.push_str(INDENT);
    out.push_str("</message>\n");
}

fn write_location(out: &mut String, location: &Location) {
    out.push_str(&INDENT.repeat(2));
    out.push_str("<location");
    push_attribute(out, "filename", location.filename.as_deref());
    push_attribute(out, "line", location.line.as_deref());
    out.push_str("/>\n");
}

fn push_element(out: &mut String, depth: usize, name: &str, text: &str) {
    let _ = write!(out, "{}<{name}>", INDENT.repeat(depth));
    push_text(out, text);
    let _ = writeln!(out, "</{name}>");
}

/// Escape `text`, writing control characters as `<byte>` elements. Carriage
/// returns are included since XML readers normalize them to newlines.
fn push_text(out: &mut String, text: &str) {
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        if u32::from(ch) < 0x20 && ch != '\t' && ch != '\n' {
            out.push_str(&escape(&text[start..index]));
            let _ = write!(out, "<byte value=\"x{:x}\"/>", u32::from(ch));
            start = index + ch.len_utf8();
        }
    }
    out.push_str(&escape(&text[start..]));
}

fn push_attribute(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }
}
