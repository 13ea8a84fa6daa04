//! Subcommand implementations.
//!
//! Every command writes its result to the given writer so that it can be
//! exercised without a terminal.

use crate::cli::Command;
use crate::error::{AppError, AppResult};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};
use tscat_catalog::{
    Catalog, CatalogStats, LoadOptions, Locale, ResourceManager, Resolver, Translator,
};
use tscat_common::{truncate_string, DuplicatePolicy};
use tscat_config::Config;

/// Widest context name shown in the statistics table.
const MAX_CONTEXT_WIDTH: usize = 48;

/// Runs `command` with `config`, writing output to `out`.
pub fn run<W: Write>(command: Command, config: &Config, out: &mut W) -> AppResult<()> {
    let options = LoadOptions::new(config.i18n.duplicate_keys);

    match command {
        Command::Lookup {
            file,
            context,
            comment,
            source,
        } => lookup(&file, &context, comment.as_deref(), &source, options, out),
        Command::Plural {
            file,
            context,
            count,
            source,
        } => plural(&file, &context, &source, count, options, out),
        Command::Stats { files, json } => stats(&files, json, options, out),
        Command::Check { files, strict } => {
            let options = if strict { LoadOptions::strict() } else { options };
            check(&files, options, out)
        }
        Command::Normalize { file, output } => normalize(&file, output.as_deref(), options, out),
        Command::Locales => locales(config, out),
    }
}

fn load_translator(file: &Path, options: LoadOptions) -> AppResult<Translator> {
    Ok(Translator::new(Catalog::from_path(file, &options)?))
}

/// Prints the translation of `source`, or `source` itself.
pub fn lookup<W: Write>(
    file: &Path,
    context: &str,
    comment: Option<&str>,
    source: &str,
    options: LoadOptions,
    out: &mut W,
) -> AppResult<()> {
    let translator = load_translator(file, options)?;
    writeln!(out, "{}", translator.lookup_disambiguated(context, source, comment))?;
    Ok(())
}

/// Prints the numerus translation of `source` for `count`.
pub fn plural<W: Write>(
    file: &Path,
    context: &str,
    source: &str,
    count: i64,
    options: LoadOptions,
    out: &mut W,
) -> AppResult<()> {
    let translator = load_translator(file, options)?;
    writeln!(out, "{}", translator.lookup_plural(context, source, count))?;
    Ok(())
}

/// Prints coverage statistics for each file.
pub fn stats<W: Write, P: AsRef<Path>>(
    files: &[P],
    json: bool,
    options: LoadOptions,
    out: &mut W,
) -> AppResult<()> {
    for file in files {
        let file = file.as_ref();
        let stats = Catalog::from_path(file, &options)?.stats();

        if json {
            let report = serde_json::json!({
                "file": file.display().to_string(),
                "contexts": stats.contexts,
                "total": stats.total,
                "completion": stats.total.completion(),
            });
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        } else {
            write_stats_table(file, &stats, out)?;
        }
    }
    Ok(())
}

fn write_stats_table<W: Write>(file: &Path, stats: &CatalogStats, out: &mut W) -> AppResult<()> {
    let width = stats
        .contexts
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .clamp("context".len(), MAX_CONTEXT_WIDTH);

    writeln!(out, "{}", file.display())?;
    writeln!(
        out,
        "  {:<width$}  {:>8}  {:>10}  {:>12}  {:>8}  {:>6}",
        "context", "finished", "unfinished", "untranslated", "obsolete", "done"
    )?;
    for row in stats.contexts.iter().chain(std::iter::once(&stats.total)) {
        writeln!(
            out,
            "  {:<width$}  {:>8}  {:>10}  {:>12}  {:>8}  {:>5.1}%",
            truncate_string(&row.name, MAX_CONTEXT_WIDTH),
            row.finished,
            row.unfinished,
            row.untranslated,
            row.obsolete,
            row.completion() * 100.0
        )?;
    }
    writeln!(
        out,
        "  {} of {} contexts incomplete",
        stats.incomplete().count(),
        stats.contexts.len()
    )?;
    Ok(())
}

/// Loads each file and reports failures; errors when any file fails.
pub fn check<W: Write, P: AsRef<Path>>(
    files: &[P],
    options: LoadOptions,
    out: &mut W,
) -> AppResult<()> {
    let mut failed = 0;

    for file in files {
        let file = file.as_ref();
        match Catalog::from_path(file, &options) {
            Ok(catalog) => {
                writeln!(
                    out,
                    "ok    {} ({} messages in {} contexts)",
                    file.display(),
                    catalog.message_count(),
                    catalog.contexts().len()
                )?;
            }
            Err(e) => {
                failed += 1;
                writeln!(out, "error {}: {}", file.display(), e)?;
            }
        }
    }

    if options.duplicate_policy == DuplicatePolicy::KeepFirst {
        info!("Duplicate keys were only reported as warnings; use --strict to reject them");
    }

    if failed > 0 {
        return Err(AppError::CheckFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

/// Rewrites `file` in canonical form to `output`, or to `out` when no
/// output path is given.
pub fn normalize<W: Write>(
    file: &Path,
    output: Option<&Path>,
    options: LoadOptions,
    out: &mut W,
) -> AppResult<()> {
    let catalog = Catalog::from_path(file, &options)?;

    match output {
        Some(path) => catalog.save(path)?,
        None => out.write_all(catalog.to_ts_string().as_bytes())?,
    }
    Ok(())
}

/// Prints the locale setting, the resolved locale and the catalog files
/// found for each configured resource.
pub fn locales<W: Write>(config: &Config, out: &mut W) -> AppResult<()> {
    let i18n = &config.i18n;
    let locale = Locale::resolve(&i18n.locale)?;
    let resources = ResourceManager::new(
        &i18n.translations_dir,
        LoadOptions::new(i18n.duplicate_keys),
    );

    writeln!(out, "setting:      {}", i18n.locale)?;
    writeln!(out, "locale:       {} ({})", locale, locale.display_name())?;
    writeln!(out, "translations: {}", resources.base_dir().display())?;
    let supported: Vec<String> = Locale::supported().iter().map(Locale::display_name).collect();
    writeln!(out, "supported:    {}", supported.join(", "))?;

    for prefix in &i18n.resources {
        let path = resources.resource_path(prefix, &locale);
        let state = if resources.exists(prefix, &locale) {
            "found"
        } else if locale.is_source_language() {
            "not needed"
        } else {
            warn!("Missing catalog {}", path.display());
            "missing"
        };

        let available: Vec<String> = resources
            .available_locales(prefix)
            .iter()
            .map(Locale::code)
            .collect();

        writeln!(out, "{prefix}:")?;
        writeln!(out, "  active:    {} [{}]", path.display(), state)?;
        writeln!(
            out,
            "  available: {}",
            if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            }
        )?;
    }
    Ok(())
}
