//! Internationalization manager
//!
//! The manager owns the set of translators for the active locale. Switching
//! locale builds a complete new [`TranslatorChain`] and publishes it with one
//! atomic swap; readers holding the previous chain keep using it until they
//! drop their `Arc`. Every publication is also announced on a
//! [`tokio::sync::watch`] channel so consumers that cached translated text
//! know to refresh it.

use crate::error::CatalogResult;
use crate::locale::Locale;
use crate::parser::LoadOptions;
use crate::resource::ResourceManager;
use crate::translator::{Resolver, Translator};
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tscat_common::LocaleSetting;

/// Translators queried together, most recently installed first
#[derive(Debug, Clone, Default)]
pub struct TranslatorChain {
    translators: Vec<Arc<Translator>>,
}

impl TranslatorChain {
    /// An empty chain; every lookup returns the source text
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a translator; it takes precedence over those installed before
    pub fn install(&mut self, translator: impl Into<Arc<Translator>>) {
        self.translators.push(translator.into());
    }

    /// Installed translators in installation order
    pub fn translators(&self) -> &[Arc<Translator>] {
        &self.translators
    }

    /// Number of installed translators
    pub fn len(&self) -> usize {
        self.translators.len()
    }

    /// Whether no translator is installed
    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }
}

impl Resolver for TranslatorChain {
    fn translate(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        self.translators
            .iter()
            .rev()
            .find_map(|t| t.translate(context, source, comment))
    }

    fn translate_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
    ) -> Option<String> {
        self.translators
            .iter()
            .rev()
            .find_map(|t| t.translate_plural(context, source, comment, count))
    }
}

#[derive(Debug)]
struct ActiveLocale {
    setting: LocaleSetting,
    locale: Locale,
    chain: Arc<TranslatorChain>,
}

/// Manages the translators of the running application
#[derive(Debug)]
pub struct I18nManager {
    /// Resource manager for loading catalog files
    resources: ResourceManager,
    /// Resource prefixes loaded for each locale, in installation order
    prefixes: Vec<String>,
    /// Currently published locale and translators
    active: ArcSwap<ActiveLocale>,
    /// Announces each newly published locale
    locale_tx: watch::Sender<Locale>,
}

impl I18nManager {
    /// Create a manager and load `setting`.
    ///
    /// An unparseable explicit locale falls back to English with a warning.
    pub fn new<P: AsRef<Path>>(
        translations_dir: P,
        prefixes: Vec<String>,
        options: LoadOptions,
        setting: LocaleSetting,
    ) -> Self {
        let resources = ResourceManager::new(translations_dir, options);
        let locale = Locale::resolve(&setting).unwrap_or_else(|e| {
            warn!("{}; falling back to {}", e, Locale::english());
            Locale::english()
        });

        let manager = Self {
            resources,
            prefixes,
            active: ArcSwap::from_pointee(ActiveLocale {
                setting: setting.clone(),
                locale: locale.clone(),
                chain: Arc::new(TranslatorChain::new()),
            }),
            locale_tx: watch::channel(locale.clone()).0,
        };

        let chain = manager.load_chain(&locale);
        manager.publish(setting, locale, chain);
        info!(
            "I18nManager initialized with locale: {}",
            manager.locale()
        );
        manager
    }

    /// Switch to `setting`.
    ///
    /// Catalogs are reloaded when the resolved language differs from the
    /// current one, or when following the system locale, which may have
    /// changed underneath. Returns whether a reload happened.
    pub fn set_locale(&self, setting: LocaleSetting) -> CatalogResult<bool> {
        let locale = Locale::resolve(&setting)?;
        let current = self.active.load();

        // Catalog files are per language, so a region change alone keeps the chain.
        if !setting.is_system() && current.locale.short_code() == locale.short_code() {
            debug!("Catalogs for {} already active", locale);
            if current.setting != setting || current.locale != locale {
                let chain = Arc::clone(&current.chain);
                self.locale_tx.send_if_modified(|announced| {
                    announced.clone_from(&locale);
                    false
                });
                self.active.store(Arc::new(ActiveLocale {
                    setting,
                    locale,
                    chain,
                }));
            }
            return Ok(false);
        }

        let chain = self.load_chain(&locale);
        self.publish(setting, locale, chain);
        info!("Switched locale to {}", self.locale());
        Ok(true)
    }

    /// React to a change of the operating system locale.
    ///
    /// Only a manager following the system locale reloads; an explicit
    /// setting is left alone and `Ok(false)` is returned.
    pub fn system_locale_changed(&self) -> CatalogResult<bool> {
        let setting = self.setting();
        if !setting.is_system() {
            return Ok(false);
        }
        self.set_locale(setting)
    }

    /// Subscribe to locale changes.
    ///
    /// The receiver starts at the current locale and is marked changed each
    /// time new translators are published. A region-only switch within the
    /// same language updates the value without a notification.
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.locale_tx.subscribe()
    }

    /// Reload every catalog of the current locale
    pub fn reload(&self) {
        let current = self.active.load_full();
        debug!("Reloading locale: {}", current.locale);
        let chain = self.load_chain(&current.locale);
        self.publish(current.setting.clone(), current.locale.clone(), chain);
    }

    /// Translators for the current locale
    pub fn current(&self) -> Arc<TranslatorChain> {
        Arc::clone(&self.active.load().chain)
    }

    /// Resolved current locale
    pub fn locale(&self) -> Locale {
        self.active.load().locale.clone()
    }

    /// Requested locale setting
    pub fn setting(&self) -> LocaleSetting {
        self.active.load().setting.clone()
    }

    /// Resource prefixes loaded for each locale
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Resource manager used for loading
    pub const fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Translation of `source` in the current locale, or `source` itself
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.current().lookup(context, source).to_string()
    }

    /// Plural-aware translation in the current locale
    pub fn tr_plural(&self, context: &str, source: &str, count: i64) -> String {
        self.current().lookup_plural(context, source, count)
    }

    fn publish(&self, setting: LocaleSetting, locale: Locale, chain: TranslatorChain) {
        self.active.store(Arc::new(ActiveLocale {
            setting,
            locale: locale.clone(),
            chain: Arc::new(chain),
        }));
        self.locale_tx.send_replace(locale);
    }

    /// Load one translator per prefix; failures leave that prefix untranslated
    fn load_chain(&self, locale: &Locale) -> TranslatorChain {
        let mut chain = TranslatorChain::new();

        for prefix in &self.prefixes {
            match self.resources.load(prefix, locale) {
                Ok(catalog) => chain.install(Translator::new(catalog)),
                Err(e) if e.is_not_found() && locale.is_source_language() => {
                    debug!("No '{}' catalog for source language {}", prefix, locale);
                }
                Err(e) if e.is_not_found() => {
                    warn!(
                        "No '{}' catalog for locale {}, showing untranslated text",
                        prefix, locale
                    );
                }
                Err(e) => {
                    error!(
                        "Failed to load '{}' catalog for locale {}: {}; showing untranslated text",
                        prefix, locale, e
                    );
                }
            }
        }

        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Message};
    use tscat_common::test_utils::{catalog_fixtures, create_temp_dir, write_fixture};
    use tscat_common::DuplicatePolicy;

    fn translator(context: &str, source: &str, text: &str) -> Translator {
        let catalog = Catalog::builder(DuplicatePolicy::Reject)
            .message(context, Message::new(source, text))
            .unwrap()
            .build();
        Translator::new(catalog)
    }

    #[test]
    fn test_chain_prefers_latest_translator() {
        let mut chain = TranslatorChain::new();
        chain.install(translator("Q", "Open", "Ouvrir (qt)"));
        chain.install(translator("Q", "Open", "Ouvrir"));
        chain.install(translator("Q", "Close", ""));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.lookup("Q", "Open"), "Ouvrir");
        assert_eq!(chain.lookup("Q", "Close"), "Close");
        assert_eq!(chain.lookup("Q", "Save"), "Save");
    }

    #[test]
    fn test_empty_chain_returns_source() {
        let chain = TranslatorChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.lookup("Q", "Open"), "Open");
        assert_eq!(chain.lookup_plural("Q", "%n files", 3), "3 files");
    }

    #[test]
    fn test_manager_loads_explicit_locale() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());

        let manager = I18nManager::new(
            dir.path(),
            vec!["qt".to_string(), "app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );

        assert_eq!(manager.locale(), Locale::french());
        assert_eq!(manager.current().len(), 1);
        assert_eq!(
            manager.tr(catalog_fixtures::CEVAS_CONTEXT, catalog_fixtures::CEVAS_SOURCE),
            catalog_fixtures::CEVAS_TRANSLATION
        );
    }

    #[test]
    fn test_switching_to_english_shows_source_text() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());
        let manager = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );
        let french = manager.current();

        assert!(manager.set_locale(LocaleSetting::explicit("en")).unwrap());
        assert_eq!(manager.locale(), Locale::english());
        assert_eq!(
            manager.tr(catalog_fixtures::CEVAS_CONTEXT, catalog_fixtures::CEVAS_SOURCE),
            catalog_fixtures::CEVAS_SOURCE
        );

        // Readers holding the previous chain are unaffected by the swap.
        assert_eq!(
            french.lookup(catalog_fixtures::CEVAS_CONTEXT, catalog_fixtures::CEVAS_SOURCE),
            catalog_fixtures::CEVAS_TRANSLATION
        );
    }

    #[test]
    fn test_same_locale_does_not_reload() {
        let dir = create_temp_dir();
        let manager = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );
        assert!(!manager.set_locale(LocaleSetting::explicit("fr_FR")).unwrap());
        assert_eq!(manager.setting(), LocaleSetting::explicit("fr_FR"));
        assert_eq!(manager.locale().code(), "fr-FR");
    }

    #[test]
    fn test_invalid_locale_is_rejected_without_change() {
        let dir = create_temp_dir();
        let manager = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );
        assert!(manager.set_locale(LocaleSetting::explicit("??")).is_err());
        assert_eq!(manager.locale(), Locale::french());
    }

    #[test]
    fn test_malformed_catalog_degrades_to_source_text() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "qt_fr.ts", catalog_fixtures::malformed_ts());
        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());

        let manager = I18nManager::new(
            dir.path(),
            vec!["qt".to_string(), "app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );
        assert_eq!(manager.current().len(), 1);
        assert_eq!(manager.tr("QObject", "Clear List"), "Clear List");
        assert_eq!(
            manager.tr(catalog_fixtures::CEVAS_CONTEXT, catalog_fixtures::CEVAS_SOURCE),
            catalog_fixtures::CEVAS_TRANSLATION
        );
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = create_temp_dir();
        let manager = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );
        assert!(manager.current().is_empty());

        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());
        manager.reload();
        assert_eq!(manager.current().len(), 1);
    }

    #[test]
    fn test_subscribers_are_notified_of_locale_changes() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());
        let manager = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );

        let mut changes = manager.subscribe();
        assert_eq!(*changes.borrow(), Locale::french());
        assert!(!changes.has_changed().unwrap());

        assert!(manager.set_locale(LocaleSetting::explicit("en")).unwrap());
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), Locale::english());

        // Same language, different region: nothing to re-translate.
        assert!(!manager.set_locale(LocaleSetting::explicit("en_GB")).unwrap());
        assert!(!changes.has_changed().unwrap());
        assert_eq!(changes.borrow().code(), "en-GB");

        manager.reload();
        assert!(changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscriber_task_sees_new_locale() {
        let dir = create_temp_dir();
        let manager = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("en"),
        );

        let mut changes = manager.subscribe();
        let waiter = tokio::spawn(async move {
            changes.changed().await.unwrap();
            changes.borrow_and_update().clone()
        });

        manager.set_locale(LocaleSetting::explicit("fr")).unwrap();
        assert_eq!(waiter.await.unwrap(), Locale::french());
    }

    #[test]
    fn test_system_locale_change_only_affects_system_setting() {
        let dir = create_temp_dir();
        let explicit = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::explicit("fr"),
        );
        let mut changes = explicit.subscribe();
        assert!(!explicit.system_locale_changed().unwrap());
        assert!(!changes.has_changed().unwrap());

        let system = I18nManager::new(
            dir.path(),
            vec!["app".to_string()],
            LoadOptions::default(),
            LocaleSetting::System,
        );
        let mut changes = system.subscribe();
        assert!(system.system_locale_changed().unwrap());
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), system.locale());
    }

    #[test]
    fn test_manager_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<I18nManager>();
        assert_send_sync::<TranslatorChain>();
    }
}
