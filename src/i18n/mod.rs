//! Supported languages and per-build language selection.
//!
//! # Architecture
//!
//! - `registry`: The fixed set of supported languages, loaded once from a fixture dataset
//! - `language`: `Language`, a code validated against the registry
//! - `selection`: Which registry languages take part in one build
//!
//! # Example
//!
//! ```rust,ignore
//! use localize_export::i18n::{Language, LanguageRegistry};
//!
//! let german = Language::from_code("de")?;
//! let all = LanguageRegistry::get()?.supported_languages();
//! ```

mod language;
mod registry;
mod selection;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use selection::{select_languages, LanguageFilter};
