//! Catalog data model
//!
//! A [`Catalog`] is an ordered list of [`Context`]s, each holding an ordered
//! list of [`Message`]s. Catalogs are assembled once through a
//! [`CatalogBuilder`] and are read-only afterwards.

use crate::error::{CatalogError, CatalogResult};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use tscat_common::DuplicatePolicy;

/// Source file position a message was extracted from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Path of the source file; omitted when equal to the previous location
    pub filename: Option<String>,
    /// Line number; kept verbatim since relative forms such as `+3` exist
    pub line: Option<String>,
}

impl Location {
    /// Create a location
    pub const fn new(filename: Option<String>, line: Option<String>) -> Self {
        Self { filename, line }
    }

    /// Create a location in a named file
    pub fn in_file(filename: impl Into<String>, line: u32) -> Self {
        Self::new(Some(filename.into()), Some(line.to_string()))
    }
}

/// Review state of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationStatus {
    /// Reviewed and used
    #[default]
    Finished,
    /// Not yet reviewed; still used when non-empty
    Unfinished,
    /// The source text no longer exists in the application; never used
    Obsolete,
}

impl TranslationStatus {
    /// Parse the `type` attribute of a `translation` element
    pub fn from_type_attribute(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete" | "vanished") => Some(Self::Obsolete),
            Some(_) => None,
        }
    }

    /// Value of the `type` attribute, if any
    pub const fn type_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
        }
    }
}

/// Translated text of a message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Translation {
    /// A single translation; empty means untranslated
    Single(String),
    /// One translation per plural form of the target language
    Plural(Vec<String>),
}

impl Translation {
    /// Whether nothing has been translated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Plural(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// Whether this is a numerus translation
    #[must_use]
    pub const fn is_plural(&self) -> bool {
        matches!(self, Self::Plural(_))
    }
}

impl Default for Translation {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

/// Identity of a message within its context
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    /// Source text
    pub source: String,
    /// Disambiguation comment
    pub comment: Option<String>,
}

/// A single source-string/translation pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    source: String,
    comment: Option<String>,
    extra_comment: Option<String>,
    translator_comment: Option<String>,
    locations: Vec<Location>,
    translation: Translation,
    status: TranslationStatus,
}

impl Message {
    /// Create a finished message with a single translation
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            comment: None,
            extra_comment: None,
            translator_comment: None,
            locations: Vec::new(),
            translation: Translation::Single(translation.into()),
            status: TranslationStatus::Finished,
        }
    }

    /// Create a finished numerus message
    pub fn plural(source: impl Into<String>, forms: Vec<String>) -> Self {
        Self {
            translation: Translation::Plural(forms),
            ..Self::new(source, String::new())
        }
    }

    /// Set the disambiguation comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the comment addressed to translators by developers
    #[must_use]
    pub fn with_extra_comment(mut self, comment: impl Into<String>) -> Self {
        self.extra_comment = Some(comment.into());
        self
    }

    /// Set the comment left by a translator
    #[must_use]
    pub fn with_translator_comment(mut self, comment: impl Into<String>) -> Self {
        self.translator_comment = Some(comment.into());
        self
    }

    /// Append a source location
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Set the review state
    #[must_use]
    pub const fn with_status(mut self, status: TranslationStatus) -> Self {
        self.status = status;
        self
    }

    /// Replace the translation
    #[must_use]
    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = translation;
        self
    }

    /// Source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Disambiguation comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Developer comment
    pub fn extra_comment(&self) -> Option<&str> {
        self.extra_comment.as_deref()
    }

    /// Translator comment
    pub fn translator_comment(&self) -> Option<&str> {
        self.translator_comment.as_deref()
    }

    /// Source locations
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Translation
    pub const fn translation(&self) -> &Translation {
        &self.translation
    }

    /// Review state
    pub const fn status(&self) -> TranslationStatus {
        self.status
    }

    /// Key identifying this message within its context
    pub fn key(&self) -> MessageKey {
        MessageKey {
            source: self.source.clone(),
            comment: self.comment.clone(),
        }
    }

    /// The text shown when no count is given, if this message may be
    /// displayed at all.
    ///
    /// Numerus messages yield their first non-empty form. Obsolete messages
    /// and empty translations yield `None`.
    pub fn usable_text(&self) -> Option<&str> {
        if self.is_obsolete() {
            return None;
        }
        match &self.translation {
            Translation::Single(text) if !text.is_empty() => Some(text.as_str()),
            Translation::Single(_) => None,
            Translation::Plural(forms) => forms.iter().map(String::as_str).find(|f| !f.is_empty()),
        }
    }

    const fn is_obsolete(&self) -> bool {
        matches!(self.status, TranslationStatus::Obsolete)
    }
}

/// A named group of messages owned by one software component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    name: String,
    messages: Vec<Message>,
}

impl Context {
    /// Context name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in document order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Find a message by source text and disambiguation comment
    pub fn message(&self, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.source == source && m.comment.as_deref() == comment)
    }
}

/// The full set of translations for one target language
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    contexts: Vec<Context>,
}

impl Catalog {
    /// Start building a catalog
    pub fn builder(policy: DuplicatePolicy) -> CatalogBuilder {
        CatalogBuilder::new(policy)
    }

    /// Format version declared by the document
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Target language declared by the document, e.g. `fr_FR`
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Source language declared by the document
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Contexts in document order
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Find a context by name
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Total number of messages across all contexts
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    /// Whether the catalog holds no messages
    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }
}

/// Assembles a [`Catalog`] while enforcing key uniqueness per context
#[derive(Debug)]
pub struct CatalogBuilder {
    catalog: Catalog,
    policy: DuplicatePolicy,
    context_index: HashMap<String, usize>,
    keys: Vec<HashSet<MessageKey>>,
}

impl CatalogBuilder {
    /// Create a builder applying `policy` to duplicate keys
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            catalog: Catalog::default(),
            policy,
            context_index: HashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Set the format version
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.set_version(Some(version.into()));
        self
    }

    /// Set the target language
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.set_language(Some(language.into()));
        self
    }

    /// Set the source language
    #[must_use]
    pub fn source_language(mut self, language: impl Into<String>) -> Self {
        self.set_source_language(Some(language.into()));
        self
    }

    pub(crate) fn set_version(&mut self, version: Option<String>) {
        self.catalog.version = version;
    }

    pub(crate) fn set_language(&mut self, language: Option<String>) {
        self.catalog.language = language;
    }

    pub(crate) fn set_source_language(&mut self, language: Option<String>) {
        self.catalog.source_language = language;
    }

    /// Ensure a context exists, keeping first-seen order
    pub fn context(&mut self, name: &str) -> usize {
        if let Some(&index) = self.context_index.get(name) {
            return index;
        }
        let index = self.catalog.contexts.len();
        self.catalog.contexts.push(Context {
            name: name.to_string(),
            messages: Vec::new(),
        });
        self.keys.push(HashSet::new());
        self.context_index.insert(name.to_string(), index);
        index
    }

    /// Add a message to a context.
    ///
    /// Obsolete entries never count as duplicates of live ones: a live
    /// message replaces an obsolete entry with the same key, and an obsolete
    /// message repeating a known key is dropped.
    ///
    /// Returns `Ok(false)` when the message got dropped, either as obsolete
    /// or as a duplicate under [`DuplicatePolicy::KeepFirst`].
    pub fn add_message(&mut self, context: &str, message: Message) -> CatalogResult<bool> {
        let index = self.context(context);
        if self.keys[index].insert(message.key()) {
            self.catalog.contexts[index].messages.push(message);
            return Ok(true);
        }

        if message.is_obsolete() {
            debug!(
                "Dropping obsolete duplicate '{}' in context '{}'",
                message.source, context
            );
            return Ok(false);
        }
        if let Some(existing) = self.catalog.contexts[index]
            .messages
            .iter_mut()
            .find(|m| m.is_obsolete() && m.source == message.source && m.comment == message.comment)
        {
            debug!(
                "Message '{}' in context '{}' replaces an obsolete entry",
                message.source, context
            );
            *existing = message;
            return Ok(true);
        }

        match self.policy {
            DuplicatePolicy::KeepFirst => {
                warn!(
                    "Duplicate message '{}' in context '{}', keeping the first occurrence",
                    message.source, context
                );
                Ok(false)
            }
            DuplicatePolicy::Reject => Err(CatalogError::DuplicateKey {
                context: context.to_string(),
                source_text: message.source,
            }),
        }
    }

    /// Chainable variant of [`Self::add_message`]
    pub fn message(mut self, context: &str, message: Message) -> CatalogResult<Self> {
        self.add_message(context, message)?;
        Ok(self)
    }

    /// Finish the catalog
    pub fn build(self) -> Catalog {
        self.catalog
    }
}
