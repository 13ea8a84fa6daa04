//! Message resolution with fallback to the source text

use crate::catalog::{Catalog, Message, Translation, TranslationStatus};
use crate::pluralization::{select_form, substitute_count, PluralRule};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves source strings to their translations.
///
/// Implementors provide [`Resolver::translate`] and
/// [`Resolver::translate_plural`], which report misses as `None`. The
/// `lookup*` methods never fail: on any miss they return the source text.
pub trait Resolver {
    /// Translation of `source` in `context`, if one may be displayed.
    ///
    /// With a disambiguation `comment`, the message carrying that comment is
    /// preferred and the uncommented message is used otherwise.
    fn translate(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str>;

    /// Numerus translation of `source` for `count`, with `%n` substituted.
    fn translate_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
    ) -> Option<String>;

    /// Translation of `source`, or `source` itself.
    fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.translate(context, source, None).unwrap_or(source)
    }

    /// Translation of `source` for a disambiguation comment, or `source` itself.
    fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        self.translate(context, source, comment).unwrap_or(source)
    }

    /// Plural-aware translation of `source`, or `source` with `%n` substituted.
    fn lookup_plural(&self, context: &str, source: &str, count: i64) -> String {
        self.translate_plural(context, source, None, count)
            .unwrap_or_else(|| substitute_count(source, count))
    }
}

#[derive(Debug, Clone, Copy)]
struct MessageRef {
    context: usize,
    message: usize,
}

/// Read-only resolver over a single [`Catalog`]
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<Catalog>,
    // context name -> source text -> messages sharing that source
    index: HashMap<String, HashMap<String, Vec<MessageRef>>>,
    plural_rule: PluralRule,
}

impl Translator {
    /// Build a resolver for `catalog`
    pub fn new(catalog: impl Into<Arc<Catalog>>) -> Self {
        let catalog = catalog.into();
        let mut index: HashMap<String, HashMap<String, Vec<MessageRef>>> = HashMap::new();

        for (context_idx, context) in catalog.contexts().iter().enumerate() {
            let sources = index.entry(context.name().to_string()).or_default();
            for (message_idx, message) in context.messages().iter().enumerate() {
                sources
                    .entry(message.source().to_string())
                    .or_default()
                    .push(MessageRef {
                        context: context_idx,
                        message: message_idx,
                    });
            }
        }

        let plural_rule = catalog
            .language()
            .map(PluralRule::for_language)
            .unwrap_or_default();

        Self {
            catalog,
            index,
            plural_rule,
        }
    }

    /// A resolver with no messages; every lookup returns the source text
    pub fn untranslated() -> Self {
        Self::new(Catalog::default())
    }

    /// Underlying catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Plural rule derived from the catalog language
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// Whether the catalog holds no messages
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Whether `context` holds a message for `source`, translated or not
    pub fn contains(&self, context: &str, source: &str) -> bool {
        self.index
            .get(context)
            .is_some_and(|sources| sources.contains_key(source))
    }

    /// Stored message for an exact key
    pub fn message(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .map(|r| &self.catalog.contexts()[r.context].messages()[r.message])
            .find(|m| m.comment() == comment)
    }

    /// Translation for an exact key without fallback to the source text
    pub fn translation(&self, context: &str, source: &str) -> Option<&str> {
        self.message(context, source, None)?.usable_text()
    }

    fn candidates<'s>(
        &'s self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> impl Iterator<Item = &'s Message> + 's {
        let exact = comment.and_then(|c| self.message(context, source, Some(c)));
        let plain = self.message(context, source, None);
        exact.into_iter().chain(plain)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::untranslated()
    }
}

impl Resolver for Translator {
    fn translate(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        self.candidates(context, source, comment)
            .find_map(Message::usable_text)
    }

    fn translate_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
    ) -> Option<String> {
        self.candidates(context, source, comment)
            .filter(|m| m.status() != TranslationStatus::Obsolete)
            .find_map(|m| match m.translation() {
                Translation::Plural(forms) => select_form(forms, self.plural_rule, count),
                Translation::Single(text) => (!text.is_empty()).then_some(text.as_str()),
            })
            .map(|text| substitute_count(text, count))
    }
}
