//! Asset staging.
//!
//! A directory asset is identified by a SHA-256 fingerprint over the relative
//! path and content of every regular file in it. Files are visited in sorted
//! order with `/` separators, so the fingerprint is the same on every
//! machine, and the archive written by [`Asset::package`] is byte-for-byte
//! reproducible.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;

use crate::error::{SynthError, SynthResult};

/// One file inside an asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Path relative to the asset root, `/`-separated.
    pub relative_path: String,
    /// Size in bytes.
    pub size: u64,
}

/// A staged directory asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    source_dir: PathBuf,
    fingerprint: String,
    files: Vec<AssetFile>,
}

impl Asset {
    /// Fingerprint the directory at `dir`.
    ///
    /// # Errors
    /// Returns [`SynthError::AssetNotFound`] if `dir` is not a directory, or
    /// [`SynthError::Io`] if a file cannot be read.
    pub fn stage(dir: impl AsRef<Path>) -> SynthResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SynthError::AssetNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut paths = Vec::new();
        collect_files(dir, dir, &mut paths)?;
        paths.sort();

        let mut hasher = Sha256::new();
        let mut files = Vec::with_capacity(paths.len());
        for relative_path in paths {
            let path = dir.join(&relative_path);
            let content = fs::read(&path).map_err(|e| SynthError::io(&path, e))?;
            hasher.update(relative_path.as_bytes());
            hasher.update([0u8]);
            hasher.update(Sha256::digest(&content));
            files.push(AssetFile {
                relative_path,
                size: content.len() as u64,
            });
        }
        let fingerprint = hex::encode(hasher.finalize());

        if files.is_empty() {
            warn!(dir = %dir.display(), "asset directory is empty");
        }
        info!(
            dir = %dir.display(),
            files = files.len(),
            fingerprint = %fingerprint,
            "staged asset"
        );

        Ok(Self {
            source_dir: dir.to_path_buf(),
            fingerprint,
            files,
        })
    }

    /// SHA-256 fingerprint (hex).
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Files in the asset, sorted by relative path.
    #[must_use]
    pub fn files(&self) -> &[AssetFile] {
        &self.files
    }

    /// Object key of the published archive in the assets bucket.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{}.zip", self.fingerprint)
    }

    /// File name of the archive inside the cloud assembly.
    #[must_use]
    pub fn archive_name(&self) -> String {
        format!("asset.{}.zip", self.fingerprint)
    }

    /// Write the asset as a zip archive into `out_dir`, returning its path.
    ///
    /// # Errors
    /// Returns [`SynthError::Io`] or [`SynthError::Zip`] if writing fails.
    pub fn package(&self, out_dir: impl AsRef<Path>) -> SynthResult<PathBuf> {
        let archive = out_dir.as_ref().join(self.archive_name());
        let file = File::create(&archive).map_err(|e| SynthError::io(&archive, e))?;
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        for entry in &self.files {
            let path = self.source_dir.join(&entry.relative_path);
            let content = fs::read(&path).map_err(|e| SynthError::io(&path, e))?;
            writer.start_file(entry.relative_path.as_str(), options)?;
            writer
                .write_all(&content)
                .map_err(|e| SynthError::io(&archive, e))?;
        }
        writer.finish()?;

        debug!(archive = %archive.display(), "packaged asset");
        Ok(archive)
    }
}

/// Recursively collect regular files under `dir` as `/`-separated paths
/// relative to `root`. Symlinks are followed.
fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> SynthResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| SynthError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SynthError::io(dir, e))?;
        let path = entry.path();
        let meta = fs::metadata(&path).map_err(|e| SynthError::io(&path, e))?;
        if meta.is_dir() {
            collect_files(root, &path, out)?;
        } else if meta.is_file() {
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push(relative);
        }
    }
    Ok(())
}
