//! Writing exports to disk and bundling them into zip archives.
//!
//! Every path is relative to the packager root. Three modes are supported:
//!
//! 1. `write_file`: one language for one platform, written at its convention path
//! 2. `bundle_platform`: every language for one platform, zipped into the
//!    platform archive (`strings.zip`, `Localizable.zip`, `locales.zip`)
//! 3. `bundle_all`: mode 2 for every platform, the three archives zipped into
//!    `<name>.zip`
//!
//! Bundling is destructive: once an archive is closed its inputs are deleted.
//! Inputs are also deleted when bundling fails, and a partially written
//! archive never stays on disk. Files finished by earlier steps of a failed
//! build are not rolled back.

use crate::catalog::FlattenedMapping;
use crate::error::{LocalizeError, Result};
use crate::export::Platform;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Writes exports and archives below a root directory.
#[derive(Debug, Clone)]
pub struct Packager {
    root: PathBuf,
}

impl Packager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one language's export for `platform` and return its path.
    ///
    /// # Arguments
    /// * `platform` - Target platform
    /// * `mapping` - Flattened mapping of one language
    ///
    /// # Returns
    /// Path of the written file, e.g. `<root>/values-en/strings.xml`.
    pub fn write_file(&self, platform: Platform, mapping: &FlattenedMapping) -> Result<PathBuf> {
        let bytes = platform.encode(mapping)?;
        let path = self.root.join(platform.file_path(mapping.language()));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LocalizeError::packaging("create directory", parent, e))?;
        }
        fs::write(&path, &bytes).map_err(|e| LocalizeError::packaging("write", &path, e))?;

        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Write every mapping for `platform`, zip them into the platform archive
    /// and delete the written files.
    ///
    /// Archive entries are named by the path convention, e.g. `values-en/strings.xml`.
    ///
    /// # Arguments
    /// * `platform` - Target platform; decides format, entry paths and archive name
    /// * `mappings` - One flattened mapping per language
    ///
    /// # Returns
    /// Path of `strings.zip`, `Localizable.zip` or `locales.zip` under the root.
    /// The per-language files are gone once this returns, whether it succeeded or not.
    pub fn bundle_platform(&self, platform: Platform, mappings: &[FlattenedMapping]) -> Result<PathBuf> {
        let mut staged = Staged::new(&self.root);
        let mut entries = Vec::with_capacity(mappings.len());

        for mapping in mappings {
            staged.track(&platform.language_dir(mapping.language()));
            let path = self.write_file(platform, mapping)?;
            entries.push((platform.file_path(mapping.language()), path));
        }

        let archive = self.write_archive(platform.archive_name(), &entries)?;
        staged.release()?;

        info!(
            "Bundled {} {} files into {}",
            entries.len(),
            platform,
            archive.display()
        );
        Ok(archive)
    }

    /// Bundle every platform and zip the platform archives into `<name>.zip`.
    ///
    /// # Arguments
    /// * `mappings` - One flattened mapping per language
    /// * `name` - Outer archive stem, usually a build id or unix timestamp
    ///
    /// # Returns
    /// Path of `<name>.zip`, holding the three platform archives.
    ///
    /// # Errors
    /// `InvalidBuildId` if `name` is not a plain file name or would collide with
    /// a platform archive; packaging errors for any I/O failure.
    pub fn bundle_all(&self, mappings: &[FlattenedMapping], name: &str) -> Result<PathBuf> {
        validate_archive_name(name)?;

        let mut staged = Staged::new(&self.root);
        let mut entries = Vec::with_capacity(Platform::ALL.len());

        for platform in Platform::ALL {
            staged.track(platform.archive_name());
            let archive = self.bundle_platform(platform, mappings)?;
            entries.push((platform.archive_name().to_string(), archive));
        }

        let outer = self.write_archive(&format!("{}.zip", name), &entries)?;
        staged.release()?;

        info!("Bundled all platforms into {}", outer.display());
        Ok(outer)
    }

    /// Zip `entries` (archive name, source path) into `root/name`.
    fn write_archive(&self, name: &str, entries: &[(String, PathBuf)]) -> Result<PathBuf> {
        let path = self.root.join(name);
        let file = File::create(&path).map_err(|e| LocalizeError::packaging("create", &path, e))?;
        let guard = PartialArchive::new(&path);

        // Fixed timestamp keeps archives reproducible
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(file);
        for (entry_name, source) in entries {
            let bytes = fs::read(source).map_err(|e| LocalizeError::packaging("read", source, e))?;
            zip.start_file(entry_name.as_str(), options)
                .map_err(|e| archive_error(&path, e))?;
            zip.write_all(&bytes)
                .map_err(|e| LocalizeError::packaging("write", &path, e))?;
        }
        zip.finish().map_err(|e| archive_error(&path, e))?;

        guard.commit();
        debug!("Closed archive {} with {} entries", path.display(), entries.len());
        Ok(path)
    }
}

fn archive_error(path: &Path, source: zip::result::ZipError) -> LocalizeError {
    LocalizeError::Archive {
        path: path.to_path_buf(),
        source,
    }
}

/// Archive names become file names in the packaging root, next to the
/// platform archives they bundle.
fn validate_archive_name(name: &str) -> Result<()> {
    let file_name = format!("{}.zip", name);
    // Case-folding filesystems treat `Strings.zip` and `strings.zip` as one file
    let aliases_platform_archive = Platform::ALL
        .iter()
        .any(|platform| platform.archive_name().eq_ignore_ascii_case(&file_name));

    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
        && !aliases_platform_archive;

    if valid {
        Ok(())
    } else {
        Err(LocalizeError::InvalidBuildId(name.to_string()))
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Inputs of an archive, deleted once it is closed or when bundling fails.
struct Staged<'a> {
    root: &'a Path,
    paths: Vec<PathBuf>,
}

impl<'a> Staged<'a> {
    fn new(root: &'a Path) -> Self {
        Self {
            root,
            paths: Vec::new(),
        }
    }

    /// Track a top-level file or directory (relative to the root).
    fn track(&mut self, relative: &str) {
        let path = self.root.join(relative);
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Delete every tracked path, reporting the first failure.
    fn release(mut self) -> Result<()> {
        let mut first_error = None;

        for path in std::mem::take(&mut self.paths) {
            if let Err(e) = remove_path(&path) {
                if first_error.is_none() {
                    first_error = Some(LocalizeError::packaging("delete", &path, e));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for Staged<'_> {
    fn drop(&mut self) {
        for path in &self.paths {
            match remove_path(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to clean up {}: {}", path.display(), e),
            }
        }
    }
}

/// Deletes an archive that was not closed successfully.
struct PartialArchive<'a> {
    path: &'a Path,
    committed: bool,
}

impl<'a> PartialArchive<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialArchive<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_file(self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove partial archive {}: {}", self.path.display(), e);
            }
        }
    }
}
