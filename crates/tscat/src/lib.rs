//! # tscat
//!
//! Command line front end for inspecting and querying Qt Linguist
//! translation catalogs.
//!
//! The binary parses arguments with clap, loads the configuration, sets up
//! logging and dispatches to one of the [`commands`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::*;
pub use commands::run;
pub use error::*;
pub use logging::init_logging;
