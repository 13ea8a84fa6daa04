//! # tscat Catalog
//!
//! Loading, writing and lookup of Qt Linguist (`.ts`) translation catalogs.
//!
//! This crate provides:
//!
//! - The catalog data model (contexts, messages, numerus forms)
//! - A loader that rejects malformed markup and handles duplicate keys
//! - A writer producing the same format, so catalogs round-trip
//! - Resolvers that fall back to the source text on any miss
//! - Locale selection and a manager that swaps translator sets atomically
//!
//! # Example
//!
//! ```rust
//! use tscat_catalog::{Catalog, Resolver, Translator};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog: Catalog = r#"<TS version="2.1" language="fr_FR">
//! <context>
//!     <name>QObject</name>
//!     <message>
//!         <source>a CeVAS object could not be created</source>
//!         <translation>un objet CeVAS n'a pas pu être créé</translation>
//!     </message>
//! </context>
//! </TS>"#
//!     .parse()?;
//!
//! let translator = Translator::new(catalog);
//! assert_eq!(
//!     translator.lookup("QObject", "a CeVAS object could not be created"),
//!     "un objet CeVAS n'a pas pu être créé"
//! );
//! assert_eq!(translator.lookup("QObject", "Open"), "Open");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod locale;
pub mod manager;
pub mod parser;
pub mod pluralization;
pub mod resource;
pub mod stats;
pub mod translator;
pub mod writer;

pub use catalog::{
    Catalog, CatalogBuilder, Context, Location, Message, MessageKey, Translation,
    TranslationStatus,
};
pub use error::{CatalogError, CatalogResult};
pub use locale::Locale;
pub use manager::{I18nManager, TranslatorChain};
pub use parser::LoadOptions;
pub use pluralization::{substitute_count, PluralRule};
pub use resource::ResourceManager;
pub use stats::{CatalogStats, ContextStats};
pub use translator::{Resolver, Translator};

pub use tscat_common::{DuplicatePolicy, LocaleSetting};
