//! Command line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tscat.toml";

/// Inspect and query Qt Linguist translation catalogs.
#[derive(Debug, Parser)]
#[command(name = "tscat")]
#[command(version)]
#[command(about = "Inspect and query Qt Linguist translation catalogs")]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate a source string, printing the source itself when untranslated
    Lookup {
        /// Catalog file
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Context the string belongs to, e.g. QObject
        #[arg(short = 'x', long)]
        context: String,

        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,

        /// Source-language text
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Translate a numerus string for a count
    Plural {
        /// Catalog file
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        /// Context the string belongs to
        #[arg(short = 'x', long)]
        context: String,

        /// Count substituted for %n
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: i64,

        /// Source-language text
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Show translation coverage per context
    Stats {
        /// Catalog files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Load catalogs and report the ones that fail
    Check {
        /// Catalog files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Treat duplicate keys as errors
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite a catalog in canonical form
    Normalize {
        /// Catalog file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file; standard output when omitted
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Show the configured and resolved locale and available catalogs
    Locales,
}
