//! Translation coverage statistics

use crate::catalog::{Catalog, Context, Message, TranslationStatus};
use serde::Serialize;

/// Message counts for one context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    /// Context name
    pub name: String,
    /// Translated and reviewed
    pub finished: usize,
    /// Translated but awaiting review
    pub unfinished: usize,
    /// No translation text
    pub untranslated: usize,
    /// No longer used by the application
    pub obsolete: usize,
}

impl ContextStats {
    fn record(&mut self, message: &Message) {
        match message.status() {
            TranslationStatus::Obsolete => self.obsolete += 1,
            _ if message.translation().is_empty() => self.untranslated += 1,
            TranslationStatus::Unfinished => self.unfinished += 1,
            TranslationStatus::Finished => self.finished += 1,
        }
    }

    fn absorb(&mut self, other: &Self) {
        self.finished += other.finished;
        self.unfinished += other.unfinished;
        self.untranslated += other.untranslated;
        self.obsolete += other.obsolete;
    }

    /// Messages the application still uses
    pub const fn active(&self) -> usize {
        self.finished + self.unfinished + self.untranslated
    }

    /// Messages that display translated text
    pub const fn translated(&self) -> usize {
        self.finished + self.unfinished
    }

    /// Share of active messages that display translated text, in `0.0..=1.0`
    #[allow(clippy::cast_precision_loss)]
    pub fn completion(&self) -> f64 {
        match self.active() {
            0 => 1.0,
            active => self.translated() as f64 / active as f64,
        }
    }
}

/// Coverage report for a whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Per-context counts in catalog order
    pub contexts: Vec<ContextStats>,
    /// Sum over all contexts
    pub total: ContextStats,
}

impl CatalogStats {
    /// Compute statistics for `catalog`
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut total = ContextStats {
            name: "total".to_string(),
            ..ContextStats::default()
        };
        let contexts: Vec<ContextStats> = catalog
            .contexts()
            .iter()
            .map(context_stats)
            .inspect(|stats| total.absorb(stats))
            .collect();

        Self { contexts, total }
    }

    /// Contexts that still have untranslated or unfinished messages
    pub fn incomplete(&self) -> impl Iterator<Item = &ContextStats> {
        self.contexts
            .iter()
            .filter(|c| c.untranslated > 0 || c.unfinished > 0)
    }
}

fn context_stats(context: &Context) -> ContextStats {
    let mut stats = ContextStats {
        name: context.name().to_string(),
        ..ContextStats::default()
    };
    for message in context.messages() {
        stats.record(message);
    }
    stats
}

impl Catalog {
    /// Coverage statistics for this catalog
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::for_catalog(self)
    }
}
