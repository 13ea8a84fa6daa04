//! Integration tests for the tscat command line front end.
//!
//! Commands run against catalogs written to temporary directories and write
//! into an in-memory buffer.

use clap::Parser;
use std::path::PathBuf;
use tscat::{commands, run, AppError, Cli};
use tscat_catalog::{Catalog, LoadOptions};
use tscat_common::test_utils::{catalog_fixtures, create_temp_dir, init_test_logging, write_fixture};
use tscat_common::LocaleSetting;
use tscat_config::Config;

fn run_cli(args: &[&str], config: &Config) -> Result<String, AppError> {
    let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
    let mut out = Vec::new();
    run(cli.command, config, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_lookup_prints_translation_or_source() {
    init_test_logging();

    let dir = create_temp_dir();
    let file = write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::app_fr_ts());
    let file = file.to_str().unwrap();
    let config = Config::default();

    let output = run_cli(
        &["tscat", "lookup", "-f", file, "-x", "QObject", catalog_fixtures::CEVAS_SOURCE],
        &config,
    )
    .unwrap();
    assert_eq!(output, format!("{}\n", catalog_fixtures::CEVAS_TRANSLATION));

    let output = run_cli(
        &["tscat", "lookup", "-f", file, "-x", "QObject", "not in the catalog"],
        &config,
    )
    .unwrap();
    assert_eq!(output, "not in the catalog\n");

    let output = run_cli(
        &[
            "tscat",
            "lookup",
            "-f",
            file,
            "-x",
            "OpenCOR::EditorListWidget",
            "--comment",
            "menu",
            "Open",
        ],
        &config,
    )
    .unwrap();
    assert_eq!(output, "Ouvrir\n");
}

#[test]
fn test_plural() {
    let dir = create_temp_dir();
    let file = write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::app_fr_ts());

    let output = run_cli(
        &[
            "tscat",
            "plural",
            "-f",
            file.to_str().unwrap(),
            "-x",
            "QObject",
            "-n",
            "3",
            "%n file(s) could not be opened",
        ],
        &Config::default(),
    )
    .unwrap();
    assert_eq!(output, "3 fichiers n'ont pas pu être ouverts\n");
}

#[test]
fn test_stats_table_and_json() {
    let dir = create_temp_dir();
    let file = write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::app_fr_ts());

    let mut out = Vec::new();
    commands::stats(&[&file], false, LoadOptions::default(), &mut out).unwrap();
    let table = String::from_utf8(out).unwrap();
    assert!(table.contains("QObject"));
    assert!(table.contains("OpenCOR::EditorListWidget"));
    assert!(table.lines().any(|line| line.trim_start().starts_with("total")));

    let mut out = Vec::new();
    commands::stats(&[&file], true, LoadOptions::default(), &mut out).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["total"]["finished"], 5);
    assert_eq!(report["total"]["obsolete"], 1);
    assert_eq!(report["contexts"].as_array().unwrap().len(), 2);
}

#[test]
fn test_check_reports_failures() {
    let dir = create_temp_dir();
    let good = write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::app_fr_ts());
    let bad = write_fixture(dir.path(), "qt_fr.ts", catalog_fixtures::malformed_ts());
    let duplicate = write_fixture(dir.path(), "dup_fr.ts", catalog_fixtures::duplicate_ts());

    let mut out = Vec::new();
    commands::check(&[&good, &duplicate], LoadOptions::default(), &mut out).unwrap();

    let mut out = Vec::new();
    let err = commands::check(&[&good, &bad, &duplicate], LoadOptions::strict(), &mut out)
        .unwrap_err();
    assert!(matches!(err, AppError::CheckFailed { failed: 2, total: 3 }));

    let report = String::from_utf8(out).unwrap();
    assert!(report.starts_with("ok    "));
    assert!(report.contains("Malformed translation resource"));
    assert!(report.contains("Duplicate message 'Clear List'"));
}

#[test]
fn test_check_strict_flag() {
    let dir = create_temp_dir();
    let duplicate = write_fixture(dir.path(), "dup_fr.ts", catalog_fixtures::duplicate_ts());
    let duplicate = duplicate.to_str().unwrap();
    let config = Config::default();

    assert!(run_cli(&["tscat", "check", duplicate], &config).is_ok());
    assert!(run_cli(&["tscat", "check", "--strict", duplicate], &config).is_err());
}

#[test]
fn test_normalize_to_file_round_trips() {
    let dir = create_temp_dir();
    let input = write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::app_fr_ts());
    let output = dir.path().join("normalized").with_extension("ts");

    let mut out = Vec::new();
    commands::normalize(&input, Some(&output), LoadOptions::default(), &mut out).unwrap();
    assert!(out.is_empty());

    let original = Catalog::from_path(&input, &LoadOptions::default()).unwrap();
    let normalized = Catalog::from_path(&output, &LoadOptions::default()).unwrap();
    assert_eq!(original, normalized);

    let mut out = Vec::new();
    commands::normalize(&output, None, LoadOptions::default(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), normalized.to_ts_string());
}

#[test]
fn test_locales_lists_catalogs() {
    let dir = create_temp_dir();
    write_fixture(dir.path(), "app_fr.ts", catalog_fixtures::cevas_ts());
    write_fixture(dir.path(), "app_de.ts", catalog_fixtures::cevas_ts());

    let mut config = Config::default();
    config.i18n.locale = LocaleSetting::explicit("fr_FR");
    config.i18n.translations_dir = PathBuf::from(dir.path());

    let output = run_cli(&["tscat", "locales"], &config).unwrap();
    assert!(output.contains("setting:      fr_FR"));
    assert!(output.contains("Français"));
    assert!(output.contains("app_fr.ts [found]"));
    assert!(output.contains("qt_fr.ts [missing]"));
    assert!(output.contains("available: de, fr"));
}

#[test]
fn test_missing_catalog_is_an_error() {
    let dir = create_temp_dir();
    let missing = dir.path().join("app_fr.ts");

    let err = run_cli(
        &["tscat", "lookup", "-f", missing.to_str().unwrap(), "-x", "QObject", "Open"],
        &Config::default(),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Catalog(_)));
}
