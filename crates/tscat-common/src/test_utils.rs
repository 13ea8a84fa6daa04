//! Test utilities and shared test helpers for tscat.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another harness may already own the global subscriber.
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `content` to `dir/name` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Translation catalog documents used across the workspace tests.
pub mod catalog_fixtures {
    /// Context of the reference message.
    pub const CEVAS_CONTEXT: &str = "QObject";
    /// Source text of the reference message.
    pub const CEVAS_SOURCE: &str = "a CeVAS object could not be created";
    /// French translation of the reference message.
    pub const CEVAS_TRANSLATION: &str = "un objet CeVAS n'a pas pu être créé";

    /// A single-message French catalog.
    pub fn cevas_ts() -> &'static str {
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="fr_FR">
<context>
    <name>QObject</name>
    <message>
        <source>a CeVAS object could not be created</source>
        <translation>un objet CeVAS n'a pas pu être créé</translation>
    </message>
</context>
</TS>
"#
    }

    /// A French application catalog with several contexts, an untranslated
    /// message, an unfinished one, an obsolete one and a numerus message.
    pub fn app_fr_ts() -> &'static str {
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="fr_FR" sourcelanguage="en_US">
<context>
    <name>QObject</name>
    <message>
        <location filename="../src/misc/cellmlfile.cpp" line="120"/>
        <source>a CeVAS object could not be created</source>
        <translation>un objet CeVAS n&apos;a pas pu être créé</translation>
    </message>
    <message>
        <source>the model could not be loaded</source>
        <translation></translation>
    </message>
    <message>
        <source>the model is not valid</source>
        <translation type="unfinished">le modèle n&apos;est pas valide</translation>
    </message>
    <message>
        <source>an old message</source>
        <translation type="obsolete">un ancien message</translation>
    </message>
    <message numerus="yes">
        <source>%n file(s) could not be opened</source>
        <translation>
            <numerusform>%n fichier n&apos;a pas pu être ouvert</numerusform>
            <numerusform>%n fichiers n&apos;ont pas pu être ouverts</numerusform>
        </translation>
    </message>
</context>
<context>
    <name>OpenCOR::EditorListWidget</name>
    <message>
        <source>Clear List</source>
        <translation>Effacer la liste</translation>
    </message>
    <message>
        <source>Open</source>
        <comment>menu</comment>
        <translation>Ouvrir</translation>
    </message>
    <message>
        <source>Open</source>
        <translation>Ouvert</translation>
    </message>
</context>
</TS>
"#
    }

    /// A catalog where the same source appears twice in one context.
    pub fn duplicate_ts() -> &'static str {
        r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="fr_FR">
<context>
    <name>QObject</name>
    <message>
        <source>Clear List</source>
        <translation>Effacer la liste</translation>
    </message>
    <message>
        <source>Clear List</source>
        <translation>Vider la liste</translation>
    </message>
</context>
</TS>
"#
    }

    /// A document whose markup is broken.
    pub fn malformed_ts() -> &'static str {
        r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="fr_FR">
<context>
    <name>QObject</name>
    <message>
        <source>Clear List</source>
        <translation>Effacer la liste</source>
    </message>
</context>
</TS>
"#
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A minimal valid configuration as TOML.
    pub fn minimal_config_toml() -> &'static str {
        r#"
[i18n]
locale = "fr"
translations_dir = "translations"
"#
    }

    /// A full configuration as YAML.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "i18n:\n",
            "  locale: system\n",
            "  translations_dir: \"/usr/share/app/translations\"\n",
            "  resources:\n",
            "    - qt\n",
            "    - app\n",
            "  duplicate_keys: reject\n",
            "\n",
            "logging:\n",
            "  filter: \"tscat=debug\"\n",
            "  json: true\n"
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod property_testing {
    use proptest::prelude::*;

    /// Strategy for context names such as `OpenCOR::CorePlugin`.
    pub fn context_name_strategy() -> impl Strategy<Value = String> {
        r"[A-Z][A-Za-z0-9]{0,12}(::[A-Z][A-Za-z0-9]{0,12})?".prop_map(|s| s.to_string())
    }

    /// Strategy for message text, including markup-significant characters,
    /// non-ASCII letters, edge whitespace and control characters that must be
    /// written as `<byte>` elements.
    pub fn message_text_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9 <>&'.,:!éèêàçÉ%\x22\t\r\n\x01-\x08\x0b\x0c\x0e-\x1f]{1,40}"
            .prop_map(|s| s.to_string())
    }
}
