//! Resource management for catalog files

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::locale::Locale;
use crate::parser::LoadOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tscat_common::{resource_file_name, CATALOG_EXTENSION};

/// Locates and loads `<prefix>_<language>.ts` files from one directory
#[derive(Debug, Clone)]
pub struct ResourceManager {
    /// Base directory for catalog files
    base_dir: PathBuf,
    /// Options applied to every load
    options: LoadOptions,
}

impl ResourceManager {
    /// Create a new ResourceManager
    pub fn new<P: AsRef<Path>>(base_dir: P, options: LoadOptions) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            options,
        }
    }

    /// Path of the catalog for `prefix` in `locale`
    pub fn resource_path(&self, prefix: &str, locale: &Locale) -> PathBuf {
        self.base_dir
            .join(resource_file_name(prefix, locale.short_code()))
    }

    /// Load the catalog for `prefix` in `locale`
    pub fn load(&self, prefix: &str, locale: &Locale) -> CatalogResult<Catalog> {
        let path = self.resource_path(prefix, locale);
        debug!("Loading resource file: {:?}", path);

        let catalog = Catalog::from_path(&path, &self.options)?;
        info!(
            "Loaded {} messages for '{}' in locale {}",
            catalog.message_count(),
            prefix,
            locale
        );
        Ok(catalog)
    }

    /// Whether a catalog file exists for `prefix` in `locale`
    pub fn exists(&self, prefix: &str, locale: &Locale) -> bool {
        self.resource_path(prefix, locale).is_file()
    }

    /// Locales for which a `prefix` catalog exists, sorted by code
    pub fn available_locales(&self, prefix: &str) -> Vec<Locale> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read translations directory {:?}: {}", self.base_dir, e);
                return Vec::new();
            }
        };

        let marker = format!("{prefix}_");
        let mut locales: Vec<Locale> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == CATALOG_EXTENSION)
            })
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                let code = stem.strip_prefix(&marker)?;
                Locale::parse(code).ok()
            })
            .collect();

        locales.sort_by_key(Locale::code);
        locales.dedup();
        locales
    }

    /// Options applied to every load
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Get the base directory for resources
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new("translations", LoadOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use tscat_common::test_utils::{catalog_fixtures, create_temp_dir, write_fixture};

    #[test]
    fn test_resource_path() {
        let manager = ResourceManager::new("/opt/app/translations", LoadOptions::default());
        assert_eq!(
            manager.resource_path("app", &Locale::parse("fr_FR").unwrap()),
            PathBuf::from("/opt/app/translations/app_fr.ts")
        );
    }

    #[test]
    fn test_load_existing_and_missing() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());
        let manager = ResourceManager::new(dir.path(), LoadOptions::default());

        assert!(manager.exists("app", &Locale::french()));
        let catalog = manager.load("app", &Locale::french()).unwrap();
        assert_eq!(catalog.message_count(), 1);

        let err = manager.load("qt", &Locale::french()).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, CatalogError::ResourceLoadError { .. }));
    }

    #[test]
    fn test_available_locales() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());
        write_fixture(dir.path(), "app_de.ts", catalog_fixtures::cevas_ts());
        write_fixture(dir.path(), "qt_fr.ts", catalog_fixtures::cevas_ts());
        write_fixture(dir.path(), "app_fr.qm", "binary");
        write_fixture(dir.path(), "notes.txt", "");

        let manager = ResourceManager::new(dir.path(), LoadOptions::default());
        let codes: Vec<_> = manager
            .available_locales("app")
            .iter()
            .map(Locale::code)
            .collect();
        assert_eq!(codes, vec!["de", "fr"]);
        assert!(manager.available_locales("missing").is_empty());
    }
}
