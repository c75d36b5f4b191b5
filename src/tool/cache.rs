//! Version-keyed on-disk cache of extracted tool distributions.
//!
//! Each version lives in `<root>/<tool>/<version>/`, next to an empty
//! `<root>/<tool>/<version>.complete` marker written once the directory is in
//! place. Archives and partial extractions stay under `<root>/_work` and are
//! removed when the operation that created them finishes.

use super::version::ToolVersion;
use crate::error::ResolveError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const WORK_DIR: &str = "_work";

#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn version_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    fn marker(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(format!("{}.complete", version))
    }

    /// Cached directory for a concrete version; "latest" never matches
    pub fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        ToolVersion::parse(version)?;
        let dir = self.version_dir(tool, version);
        if dir.is_dir() && self.marker(tool, version).exists() {
            debug!("Cache hit for {} {} at {}", tool, version, dir.display());
            Some(dir)
        } else {
            None
        }
    }

    /// Working area under the cache root, so cached moves stay on one filesystem
    pub fn work_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.root.join(WORK_DIR);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Extract `archive` and move the result into the cache under `tool`/`version`.
    ///
    /// The extraction happens in a temporary directory under the work area,
    /// which is removed again if anything fails.
    pub fn install(
        &self,
        archive: &Path,
        tool: &str,
        version: &str,
    ) -> Result<PathBuf, ResolveError> {
        let scratch = tempfile::Builder::new()
            .prefix("extract-")
            .tempdir_in(self.work_dir()?)?;
        extract_zip(archive, scratch.path())?;
        let dest = self.move_into(scratch.path(), tool, version)?;
        // The rename left nothing behind for the guard to delete
        drop(scratch);
        Ok(dest)
    }

    fn move_into(&self, src: &Path, tool: &str, version: &str) -> std::io::Result<PathBuf> {
        let dest = self.version_dir(tool, version);
        let marker = self.marker(tool, version);

        // Last writer wins when two runs populate the same version
        if marker.exists() {
            fs::remove_file(&marker)?;
        }
        if dest.exists() {
            fs::remove_dir_all(&dest)?;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(src, &dest)?;
        fs::write(&marker, "")?;

        debug!("Cached {} {} at {}", tool, version, dest.display());
        Ok(dest)
    }
}

/// Extract a zip archive into an existing directory
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<(), ResolveError> {
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    debug!(
        "Extracting {} entries from {} to {}",
        zip.len(),
        archive.display(),
        dest.display()
    );
    zip.extract(dest)?;
    Ok(())
}

/// Extract a zip archive into a fresh temporary directory that is removed on drop
pub fn extract_to_temp(archive: &Path) -> Result<TempDir, ResolveError> {
    let dir = tempfile::Builder::new().prefix("pmd-").tempdir()?;
    extract_zip(archive, dir.path())?;
    Ok(dir)
}

/// First top-level entry of an extracted archive, by name
pub fn first_entry(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries.into_iter().next())
}
