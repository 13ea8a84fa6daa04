//! Shared utility functions.

/// File extension of translation catalogs.
pub const CATALOG_EXTENSION: &str = "ts";

/// Extracts the two-letter language prefix from a locale string.
///
/// Accepts POSIX (`fr_FR.UTF-8`), BCP 47 (`fr-FR`) and bare (`fr`) forms.
/// Returns `None` for the `C` and `POSIX` locales and for anything that does
/// not start with two ASCII letters.
pub fn language_prefix(locale: &str) -> Option<String> {
    let locale = locale.trim();
    if locale.is_empty() || locale == "C" || locale.starts_with("C.") || locale == "POSIX" {
        return None;
    }

    let prefix: String = locale.chars().take(2).collect();
    if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(prefix.to_ascii_lowercase())
    } else {
        None
    }
}

/// Builds the file name of a catalog resource, e.g. `app_fr.ts`.
pub fn resource_file_name(prefix: &str, language: &str) -> String {
    format!("{prefix}_{language}.{CATALOG_EXTENSION}")
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
