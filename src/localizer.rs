//! Build pipeline: records in, export bytes out.
//!
//! Each call is one isolated build: select languages, ingest records into a
//! fresh `Catalog`, flatten it per language, export, package inside a staging
//! directory of its own, and read the result back. The staging directory is
//! removed when the build ends, whether it succeeded or not.
//!
//! The async functions run the whole pipeline on the blocking thread pool.
//! Dropping their future does not interrupt a build already in progress; it
//! still runs to completion and cleans up after itself.

use crate::catalog::{Catalog, FlattenedMapping};
use crate::config::Config;
use crate::error::{LocalizeError, Result};
use crate::export::Platform;
use crate::i18n::{select_languages, LanguageRegistry};
use crate::ingest::{ingest, RawRecord};
use crate::packager::Packager;
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::info;

/// Input of one build.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Raw translation records
    pub records: Vec<RawRecord>,

    /// Languages of the requesting application; empty means every registry language
    pub languages: Vec<String>,

    /// Name of the all-platform archive; defaults to the current unix second
    pub build_id: Option<String>,
}

impl BuildRequest {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn with_languages<S: Into<String>>(mut self, languages: impl IntoIterator<Item = S>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = Some(build_id.into());
        self
    }
}

/// Entry point for catalog builds and exports.
#[derive(Debug, Clone)]
pub struct Localizer {
    registry: Arc<LanguageRegistry>,
    config: Arc<Config>,
}

impl Localizer {
    /// Create a localizer, loading the configured language fixture or the
    /// embedded one.
    ///
    /// # Errors
    /// `Configuration` if the language dataset is missing or malformed.
    pub fn new(config: Config) -> Result<Self> {
        let registry = match &config.language_fixture {
            Some(path) => LanguageRegistry::from_path(path)?,
            None => LanguageRegistry::get()?.clone(),
        };

        info!(
            "Loaded {} supported languages",
            registry.list_all().len()
        );
        Ok(Self::with_registry(config, registry))
    }

    pub fn with_registry(config: Config, registry: LanguageRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Select the build languages and ingest the request's records.
    pub fn catalog(&self, request: &BuildRequest) -> Result<Catalog> {
        let languages = select_languages(&self.registry, &self.config.languages, &request.languages)?;
        ingest(&request.records, &languages)
    }

    // ==================== Blocking Pipeline ====================

    /// Export one language for one platform.
    ///
    /// # Errors
    /// `UnsupportedPlatform` / `UnknownLanguage` (not found) before any record
    /// is read; validation or packaging errors from the build itself.
    pub fn build_file(&self, request: &BuildRequest, language: &str, platform: &str) -> Result<Vec<u8>> {
        let platform: Platform = platform.parse()?;
        let language = language.to_lowercase();
        if !self.registry.contains(&language) {
            return Err(LocalizeError::UnknownLanguage(language));
        }

        let catalog = self.catalog(request)?;
        let mapping = catalog.build_language(&language)?;

        let staging = self.staging()?;
        let path = Packager::new(staging.path()).write_file(platform, &mapping)?;
        read_output(&path)
    }

    /// Export every build language for one platform as a zip.
    pub fn build_platform_zip(&self, request: &BuildRequest, platform: &str) -> Result<Vec<u8>> {
        let platform: Platform = platform.parse()?;
        let mappings = self.build_mappings(request)?;

        let staging = self.staging()?;
        let archive = Packager::new(staging.path()).bundle_platform(platform, &mappings)?;
        read_output(&archive)
    }

    /// Export every build language for every platform as a zip of platform zips.
    pub fn build_bundle_zip(&self, request: &BuildRequest) -> Result<Vec<u8>> {
        let mappings = self.build_mappings(request)?;
        let name = request
            .build_id
            .clone()
            .unwrap_or_else(|| Utc::now().timestamp().to_string());

        let staging = self.staging()?;
        let archive = Packager::new(staging.path()).bundle_all(&mappings, &name)?;
        read_output(&archive)
    }

    // ==================== Async Pipeline ====================

    /// Async form of [`Localizer::build_file`].
    pub async fn file(&self, request: BuildRequest, language: String, platform: String) -> Result<Vec<u8>> {
        let localizer = self.clone();
        run_blocking(move || localizer.build_file(&request, &language, &platform)).await
    }

    /// Async form of [`Localizer::build_platform_zip`].
    pub async fn platform_zip(&self, request: BuildRequest, platform: String) -> Result<Vec<u8>> {
        let localizer = self.clone();
        run_blocking(move || localizer.build_platform_zip(&request, &platform)).await
    }

    /// Async form of [`Localizer::build_bundle_zip`].
    pub async fn bundle_zip(&self, request: BuildRequest) -> Result<Vec<u8>> {
        let localizer = self.clone();
        run_blocking(move || localizer.build_bundle_zip(&request)).await
    }

    fn build_mappings(&self, request: &BuildRequest) -> Result<Vec<FlattenedMapping>> {
        let catalog = self.catalog(request)?;
        catalog
            .languages()
            .iter()
            .map(|language| catalog.build_language(language.code()))
            .collect()
    }

    /// Per-build staging directory, removed when dropped.
    fn staging(&self) -> Result<TempDir> {
        tempfile::Builder::new()
            .prefix("localize-")
            .tempdir_in(&self.config.work_dir)
            .map_err(LocalizeError::Staging)
    }
}

fn read_output(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| LocalizeError::packaging("read", path, e))
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| LocalizeError::Task(e.to_string()))?
}
