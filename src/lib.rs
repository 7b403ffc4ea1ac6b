//! Translation catalog builder and client bundle exporter.
//!
//! Raw key and namespace records are ingested into a per-build [`Catalog`],
//! flattened per language, encoded for iOS (`.strings`), Android (resource XML)
//! and Web (JSON), and packaged into zip bundles.
//!
//! ```rust,ignore
//! use localize_export::{BuildRequest, Config, Localizer, RawRecord};
//!
//! let localizer = Localizer::new(Config::from_env()?)?;
//! let request = BuildRequest::new(records).with_languages(["en", "de"]);
//! let bytes = localizer.platform_zip(request, "ANDROID".to_string()).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod ingest;
pub mod localizer;
pub mod packager;

pub use catalog::{Catalog, CatalogEntry, EntryKind, FlattenedMapping, Translation};
pub use config::Config;
pub use error::{LocalizeError, Result};
pub use export::Platform;
pub use i18n::{Language, LanguageRegistry};
pub use ingest::{ingest, RawRecord};
pub use localizer::{BuildRequest, Localizer};
pub use packager::Packager;
