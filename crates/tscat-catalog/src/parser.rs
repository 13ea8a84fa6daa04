//! Catalog loader for the Qt Linguist `.ts` format
//!
//! The loader accepts a `TS` root holding `context` elements, each with one
//! `name` and any number of `message` elements. Elements it does not know are
//! skipped so newer tool versions still load; structural violations and
//! markup errors become [`CatalogError::MalformedResource`].

use crate::catalog::{Catalog, CatalogBuilder, Location, Message, Translation, TranslationStatus};
use crate::error::{CatalogError, CatalogResult};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error};
use tscat_common::DuplicatePolicy;

/// Options controlling how a catalog is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// What to do when a context repeats a key
    pub duplicate_policy: DuplicatePolicy,
}

impl LoadOptions {
    /// Options with the given duplicate policy
    pub const fn new(duplicate_policy: DuplicatePolicy) -> Self {
        Self { duplicate_policy }
    }

    /// Options that reject duplicate keys
    pub const fn strict() -> Self {
        Self::new(DuplicatePolicy::Reject)
    }
}

impl Catalog {
    /// Parse a catalog from markup
    pub fn parse(input: &str, options: &LoadOptions) -> CatalogResult<Self> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        CatalogParser::new(input, options.duplicate_policy).parse()
    }

    /// Read and parse a catalog file
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> CatalogResult<Self> {
        let path = path.as_ref();
        debug!("Loading catalog file: {:?}", path);

        let bytes = fs::read(path).map_err(|source| CatalogError::ResourceLoadError {
            path: path.to_path_buf(),
            source,
        })?;

        let content = String::from_utf8(bytes).map_err(|e| {
            let position = u64::try_from(e.utf8_error().valid_up_to()).unwrap_or(u64::MAX);
            CatalogError::MalformedResource {
                reason: "resource is not valid UTF-8".to_string(),
                position,
            }
        })?;

        Self::parse(&content, options).inspect_err(|e| {
            error!("Failed to parse catalog {:?}: {}", path, e);
        })
    }
}

impl FromStr for Catalog {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &LoadOptions::default())
    }
}

/// Fields collected while reading one `message` element
#[derive(Default)]
struct PendingMessage {
    source: Option<String>,
    comment: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    locations: Vec<Location>,
    translation: Option<(Translation, TranslationStatus)>,
}

struct CatalogParser<'a> {
    reader: Reader<&'a [u8]>,
    builder: CatalogBuilder,
}

impl<'a> CatalogParser<'a> {
    fn new(input: &'a str, policy: DuplicatePolicy) -> Self {
        let mut reader = Reader::from_str(input);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = true;

        Self {
            reader,
            builder: CatalogBuilder::new(policy),
        }
    }

    fn parse(mut self) -> CatalogResult<Catalog> {
        loop {
            match self.next_event()? {
                Event::Start(e) if e.name().as_ref() == b"TS" => {
                    self.read_root_attributes(&e)?;
                    self.parse_root()?;
                    break;
                }
                Event::Empty(e) if e.name().as_ref() == b"TS" => {
                    self.read_root_attributes(&e)?;
                    break;
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(self.malformed(format!(
                        "expected root element <TS>, found <{}>",
                        element_name(&e)
                    )));
                }
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed("text outside the root element"));
                }
                Event::End(_) => return Err(self.malformed("unexpected closing tag")),
                Event::Eof => return Err(self.malformed("missing root element <TS>")),
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
            }
        }

        loop {
            match self.next_event()? {
                Event::Eof => break,
                Event::Text(t) if is_blank(&t) => {}
                Event::Comment(_) | Event::PI(_) => {}
                _ => return Err(self.malformed("content after the root element")),
            }
        }

        let catalog = self.builder.build();
        debug!(
            "Parsed catalog with {} contexts and {} messages",
            catalog.contexts().len(),
            catalog.message_count()
        );
        Ok(catalog)
    }

    fn read_root_attributes(&mut self, root: &BytesStart<'_>) -> CatalogResult<()> {
        let version = self.attribute(root, b"version")?;
        let language = self.attribute(root, b"language")?;
        let source_language = self.attribute(root, b"sourcelanguage")?;
        self.builder.set_version(version);
        self.builder.set_language(language);
        self.builder.set_source_language(source_language);
        Ok(())
    }

    fn parse_root(&mut self) -> CatalogResult<()> {
        loop {
            match self.next_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"context" => self.parse_context()?,
                    b"message" => return Err(self.malformed("<message> outside of a <context>")),
                    _ => self.skip_element()?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"context" => return Err(self.malformed("<context> without a <name>")),
                    b"message" => return Err(self.malformed("<message> outside of a <context>")),
                    _ => {}
                },
                Event::End(_) => return Ok(()),
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed("unexpected text inside <TS>"));
                }
                Event::Eof => return Err(self.malformed("unexpected end of document inside <TS>")),
                _ => {}
            }
        }
    }

    fn parse_context(&mut self) -> CatalogResult<()> {
        let mut name: Option<String> = None;
        let mut messages = Vec::new();

        loop {
            match self.next_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"name" => {
                        let text = self.read_text()?;
                        self.set_once(&mut name, text, "name")?;
                    }
                    b"message" => messages.push(self.parse_message(&e)?),
                    b"context" => return Err(self.malformed("nested <context>")),
                    _ => self.skip_element()?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"name" => self.set_once(&mut name, String::new(), "name")?,
                    b"message" => return Err(self.malformed("<message> without a <source>")),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed("unexpected text inside <context>"));
                }
                Event::Eof => {
                    return Err(self.malformed("unexpected end of document inside <context>"));
                }
                _ => {}
            }
        }

        let name = name.ok_or_else(|| self.malformed("<context> without a <name>"))?;
        self.builder.context(&name);
        for message in messages {
            self.builder.add_message(&name, message)?;
        }
        Ok(())
    }

    fn parse_message(&mut self, start: &BytesStart<'_>) -> CatalogResult<Message> {
        let numerus = self.attribute(start, b"numerus")?.as_deref() == Some("yes");
        let mut pending = PendingMessage::default();

        loop {
            match self.next_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"source" => {
                        let text = self.read_text()?;
                        self.set_once(&mut pending.source, text, "source")?;
                    }
                    b"comment" => {
                        let text = self.read_text()?;
                        self.set_once(&mut pending.comment, text, "comment")?;
                    }
                    b"extracomment" => {
                        let text = self.read_text()?;
                        self.set_once(&mut pending.extra_comment, text, "extracomment")?;
                    }
                    b"translatorcomment" => {
                        let text = self.read_text()?;
                        self.set_once(&mut pending.translator_comment, text, "translatorcomment")?;
                    }
                    b"location" => {
                        pending.locations.push(self.location(&e)?);
                        self.skip_element()?;
                    }
                    b"translation" => {
                        let status = self.translation_status(&e)?;
                        let translation = if numerus {
                            Translation::Plural(self.read_numerus_forms()?)
                        } else {
                            Translation::Single(self.read_text()?)
                        };
                        self.set_once(&mut pending.translation, (translation, status), "translation")?;
                    }
                    _ => self.skip_element()?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"source" => self.set_once(&mut pending.source, String::new(), "source")?,
                    b"location" => pending.locations.push(self.location(&e)?),
                    b"translation" => {
                        let status = self.translation_status(&e)?;
                        let translation = if numerus {
                            Translation::Plural(Vec::new())
                        } else {
                            Translation::Single(String::new())
                        };
                        self.set_once(&mut pending.translation, (translation, status), "translation")?;
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed("unexpected text inside <message>"));
                }
                Event::Eof => {
                    return Err(self.malformed("unexpected end of document inside <message>"));
                }
                _ => {}
            }
        }

        let source = pending
            .source
            .ok_or_else(|| self.malformed("<message> without a <source>"))?;
        let (translation, status) = pending.translation.unwrap_or_else(|| {
            let empty = if numerus {
                Translation::Plural(Vec::new())
            } else {
                Translation::default()
            };
            (empty, TranslationStatus::Finished)
        });

        let mut message = Message::new(source, String::new())
            .with_translation(translation)
            .with_status(status);
        if let Some(comment) = pending.comment {
            message = message.with_comment(comment);
        }
        if let Some(comment) = pending.extra_comment {
            message = message.with_extra_comment(comment);
        }
        if let Some(comment) = pending.translator_comment {
            message = message.with_translator_comment(comment);
        }
        for location in pending.locations {
            message = message.with_location(location);
        }
        Ok(message)
    }

    fn read_numerus_forms(&mut self) -> CatalogResult<Vec<String>> {
        let mut forms = Vec::new();
        loop {
            match self.next_event()? {
                Event::Start(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(self.read_text()?);
                }
                Event::Empty(e) if e.name().as_ref() == b"numerusform" => forms.push(String::new()),
                Event::Start(_) => self.skip_element()?,
                Event::End(_) => return Ok(forms),
                Event::Text(t) if is_blank(&t) => {}
                Event::Text(_) | Event::CData(_) => {
                    return Err(self.malformed("text outside <numerusform> in a numerus translation"));
                }
                Event::Eof => {
                    return Err(self.malformed("unexpected end of document inside <translation>"));
                }
                _ => {}
            }
        }
    }

    /// Collect character data up to the end tag of the current element.
    fn read_text(&mut self) -> CatalogResult<String> {
        let mut text = String::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|e| self.malformed(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => {
                    let raw = std::str::from_utf8(&c).map_err(|e| self.malformed(e.to_string()))?;
                    text.push_str(raw);
                }
                Event::End(_) => return Ok(text),
                Event::Empty(e) if e.name().as_ref() == b"byte" => {
                    text.push(self.byte_value(&e)?);
                }
                Event::Start(e) if e.name().as_ref() == b"byte" => {
                    text.push(self.byte_value(&e)?);
                    self.skip_element()?;
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(self.malformed(format!(
                        "unexpected element <{}> inside text content",
                        element_name(&e)
                    )));
                }
                Event::Eof => return Err(self.malformed("unexpected end of document in text")),
                _ => {}
            }
        }
    }

    /// Decode a `<byte value="x1b"/>` escape into the character it stands for.
    ///
    /// Values starting with `x` are hexadecimal, anything else decimal.
    fn byte_value(&self, element: &BytesStart<'_>) -> CatalogResult<char> {
        let value = self
            .attribute(element, b"value")?
            .ok_or_else(|| self.malformed("<byte> without a value"))?;
        let code = match value.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse::<u32>(),
        };
        code.ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.malformed(format!("invalid <byte> value '{value}'")))
    }

    /// Skip an element whose start tag was just read, including its children.
    fn skip_element(&mut self) -> CatalogResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(self.malformed("unexpected end of document")),
                _ => {}
            }
        }
        Ok(())
    }

    fn location(&self, element: &BytesStart<'_>) -> CatalogResult<Location> {
        Ok(Location::new(
            self.attribute(element, b"filename")?,
            self.attribute(element, b"line")?,
        ))
    }

    fn translation_status(&self, element: &BytesStart<'_>) -> CatalogResult<TranslationStatus> {
        let kind = self.attribute(element, b"type")?;
        TranslationStatus::from_type_attribute(kind.as_deref()).ok_or_else(|| {
            self.malformed(format!(
                "unknown translation type '{}'",
                kind.unwrap_or_default()
            ))
        })
    }

    fn attribute(&self, element: &BytesStart<'_>, key: &[u8]) -> CatalogResult<Option<String>> {
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| self.malformed(e.to_string()))?;
            if attribute.key.as_ref() == key {
                let value = attribute
                    .unescape_value()
                    .map_err(|e| self.malformed(e.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn set_once<T>(&self, slot: &mut Option<T>, value: T, element: &str) -> CatalogResult<()> {
        if slot.is_some() {
            return Err(self.malformed(format!("more than one <{element}>")));
        }
        *slot = Some(value);
        Ok(())
    }

    fn next_event(&mut self) -> CatalogResult<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|e| self.malformed(e.to_string()))
    }

    fn malformed(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::MalformedResource {
            reason: reason.into(),
            position: u64::try_from(self.reader.buffer_position()).unwrap_or(u64::MAX),
        }
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn element_name<'b>(element: &'b BytesStart<'_>) -> Cow<'b, str> {
    String::from_utf8_lossy(element.name().into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tscat_common::test_utils::catalog_fixtures;

    fn parse(input: &str) -> CatalogResult<Catalog> {
        Catalog::parse(input, &LoadOptions::default())
    }

    fn assert_malformed(input: &str) {
        let result = parse(input);
        assert!(
            matches!(result, Err(CatalogError::MalformedResource { .. })),
            "expected malformed resource, got {result:?}"
        );
    }

    #[test]
    fn test_parse_reference_catalog() {
        let catalog = parse(catalog_fixtures::cevas_ts()).unwrap();
        assert_eq!(catalog.version(), Some("2.1"));
        assert_eq!(catalog.language(), Some("fr_FR"));
        assert_eq!(catalog.source_language(), None);

        let context = catalog.context(catalog_fixtures::CEVAS_CONTEXT).unwrap();
        let message = context.message(catalog_fixtures::CEVAS_SOURCE, None).unwrap();
        assert_eq!(message.usable_text(), Some(catalog_fixtures::CEVAS_TRANSLATION));
    }

    #[test]
    fn test_parse_full_catalog() {
        let catalog = parse(catalog_fixtures::app_fr_ts()).unwrap();
        assert_eq!(catalog.contexts().len(), 2);
        assert_eq!(catalog.message_count(), 8);

        let qobject = catalog.context("QObject").unwrap();
        let located = qobject.message(catalog_fixtures::CEVAS_SOURCE, None).unwrap();
        assert_eq!(
            located.locations(),
            &[Location::in_file("../src/misc/cellmlfile.cpp", 120)]
        );
        assert_eq!(located.usable_text(), Some(catalog_fixtures::CEVAS_TRANSLATION));

        let unfinished = qobject.message("the model is not valid", None).unwrap();
        assert_eq!(unfinished.status(), TranslationStatus::Unfinished);

        let obsolete = qobject.message("an old message", None).unwrap();
        assert_eq!(obsolete.status(), TranslationStatus::Obsolete);

        let numerus = qobject
            .message("%n file(s) could not be opened", None)
            .unwrap();
        assert_eq!(
            numerus.translation(),
            &Translation::Plural(vec![
                "%n fichier n'a pas pu être ouvert".to_string(),
                "%n fichiers n'ont pas pu être ouverts".to_string(),
            ])
        );

        let editor = catalog.context("OpenCOR::EditorListWidget").unwrap();
        assert_eq!(
            editor.message("Open", Some("menu")).unwrap().usable_text(),
            Some("Ouvrir")
        );
        assert_eq!(editor.message("Open", None).unwrap().usable_text(), Some("Ouvert"));
    }

    #[test]
    fn test_empty_root_is_an_empty_catalog() {
        let catalog = parse(r#"<?xml version="1.0"?><TS version="2.1"/>"#).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.version(), Some("2.1"));
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let catalog = parse(
            r#"<TS>
<defaultcodec>UTF-8</defaultcodec>
<context>
    <name>Q</name>
    <message id="open">
        <oldsource>Opn</oldsource>
        <source>Open</source>
        <userdata><nested>x</nested></userdata>
        <translation>Ouvrir</translation>
    </message>
</context>
</TS>"#,
        )
        .unwrap();
        assert_eq!(
            catalog.context("Q").unwrap().message("Open", None).unwrap().usable_text(),
            Some("Ouvrir")
        );
    }

    #[test]
    fn test_cdata_and_entities() {
        let catalog = parse(
            r#"<TS><context><name>Q</name><message>
<source>&lt;b&gt;Bold&lt;/b&gt; &amp; more</source>
<translation><![CDATA[<b>Gras</b>]]> &amp; plus</translation>
</message></context></TS>"#,
        )
        .unwrap();
        let message = catalog
            .context("Q")
            .unwrap()
            .message("<b>Bold</b> & more", None)
            .unwrap();
        assert_eq!(message.usable_text(), Some("<b>Gras</b> & plus"));
    }

    #[test]
    fn test_whitespace_in_text_is_preserved() {
        let catalog =
            parse("<TS><context><name>Q</name><message><source> a </source><translation> b </translation></message></context></TS>")
                .unwrap();
        let message = catalog.context("Q").unwrap().message(" a ", None).unwrap();
        assert_eq!(message.usable_text(), Some(" b "));
    }

    #[test]
    fn test_byte_elements_decode_control_characters() {
        let catalog = parse(
            r#"<TS><context><name>Q</name><message>
<source>a<byte value="x1b"/>b</source>
<translation>c<byte value="27"/>d<byte value="X7"></byte></translation>
</message></context></TS>"#,
        )
        .unwrap();
        let message = catalog.context("Q").unwrap().message("a\u{1b}b", None).unwrap();
        assert_eq!(message.usable_text(), Some("c\u{1b}d\u{7}"));
    }

    #[test]
    fn test_invalid_byte_elements() {
        assert_malformed(
            "<TS><context><name>Q</name><message><source>a<byte/></source></message></context></TS>",
        );
        assert_malformed(
            r#"<TS><context><name>Q</name><message><source>a<byte value="xzz"/></source></message></context></TS>"#,
        );
        assert_malformed(
            r#"<TS><context><name>Q</name><message><source>a<byte value="xd800"/></source></message></context></TS>"#,
        );
        assert_malformed(
            "<TS><context><name>Q</name><message><source>a<b>bold</b></source></message></context></TS>",
        );
    }

    #[test]
    fn test_repeated_context_names_merge() {
        let catalog = parse(
            "<TS><context><name>Q</name><message><source>a</source><translation>x</translation></message></context>\
             <context><name>Q</name><message><source>b</source><translation>y</translation></message></context></TS>",
        )
        .unwrap();
        assert_eq!(catalog.contexts().len(), 1);
        assert_eq!(catalog.message_count(), 2);
    }

    #[test]
    fn test_duplicate_policies() {
        let catalog = parse(catalog_fixtures::duplicate_ts()).unwrap();
        let message = catalog.context("QObject").unwrap().message("Clear List", None).unwrap();
        assert_eq!(message.usable_text(), Some("Effacer la liste"));

        let result = Catalog::parse(catalog_fixtures::duplicate_ts(), &LoadOptions::strict());
        assert!(matches!(result, Err(CatalogError::DuplicateKey { .. })));
    }

    #[test]
    fn test_malformed_documents() {
        assert_malformed(catalog_fixtures::malformed_ts());
        assert_malformed("");
        assert_malformed("just text");
        assert_malformed("<catalog></catalog>");
        assert_malformed("<TS><context><name>Q</name>");
        assert_malformed("<TS><message><source>a</source></message></TS>");
        assert_malformed("<TS><context><message><source>a</source></message></context></TS>");
        assert_malformed("<TS><context><name>Q</name><message><translation>x</translation></message></context></TS>");
        assert_malformed("<TS><context><name>Q</name><name>R</name></context></TS>");
        assert_malformed("<TS><context><name>Q</name><message><source>a<b/></source></message></context></TS>");
        assert_malformed(r#"<TS><context><name>Q</name><message><source>a</source><translation type="weird">x</translation></message></context></TS>"#);
        assert_malformed("<TS></TS><TS></TS>");
        assert_malformed("<TS><context><name>Q &bogus;</name></context></TS>");
    }

    #[test]
    fn test_malformed_reports_position() {
        let err = parse(catalog_fixtures::malformed_ts()).unwrap_err();
        match err {
            CatalogError::MalformedResource { position, .. } => assert!(position > 0),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let input = format!("\u{feff}{}", catalog_fixtures::cevas_ts());
        assert!(parse(&input).is_ok());
    }
}
