//! On-disk storage of compressed bundles.
//!
//! Bundles live directly in the cache directory as `<fingerprint>.<ext>`.
//! Writes go through a temporary file and a rename, so a concurrent reader
//! sees either the old bundle or the new one; when two writers race on the
//! same fingerprint the last rename wins, which is harmless because both
//! produced the bundle from the same sources.

use std::path::{Path, PathBuf};

use crush_common::{AssetKind, Fingerprint};

use crate::error::CacheError;

/// Store for compressed bundles rooted at the cache directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory holding the bundle files.
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at `cache_dir`. Nothing is created on disk yet.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// The directory bundles are written to.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Ensures the cache directory exists.
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|e| CacheError::Io {
            path: self.cache_dir.clone(),
            source: e,
        })
    }

    /// The bundle file name for a fingerprint, e.g. `0123456789abcdef.js`.
    pub fn file_name(fingerprint: &Fingerprint, kind: AssetKind) -> String {
        format!("{fingerprint}.{}", kind.extension())
    }

    /// The full path of the bundle for a fingerprint.
    pub fn entry_path(&self, fingerprint: &Fingerprint, kind: AssetKind) -> PathBuf {
        self.cache_dir.join(Self::file_name(fingerprint, kind))
    }

    /// Writes a bundle, replacing any previous version, and returns its path.
    pub fn write_entry(
        &self,
        fingerprint: &Fingerprint,
        kind: AssetKind,
        contents: &str,
    ) -> Result<PathBuf, CacheError> {
        self.ensure_dir()?;

        let path = self.entry_path(fingerprint, kind);
        let temp = self.cache_dir.join(format!(
            "{}.{}.tmp",
            Self::file_name(fingerprint, kind),
            std::process::id()
        ));

        std::fs::write(&temp, contents).map_err(|e| CacheError::Io {
            path: temp.clone(),
            source: e,
        })?;
        std::fs::rename(&temp, &path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }

    /// Reads a bundle, returning `None` if it has not been written.
    pub fn read_entry(
        &self,
        fingerprint: &Fingerprint,
        kind: AssetKind,
    ) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(fingerprint, kind);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }

    /// Removes bundles of `kind` whose fingerprint is not in `live`.
    ///
    /// Only files named `<16 hex>.<ext>` are considered; anything else in the
    /// directory is left alone. Returns the number of files removed.
    pub fn gc(&self, kind: AssetKind, live: &[Fingerprint]) -> Result<usize, CacheError> {
        if !self.cache_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let entries = std::fs::read_dir(&self.cache_dir).map_err(|e| CacheError::Io {
            path: self.cache_dir.clone(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.cache_dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(kind.extension()) {
                continue;
            }
            let Some(fingerprint) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Fingerprint::parse)
            else {
                continue;
            };
            if !live.contains(&fingerprint) {
                std::fs::remove_file(&path).map_err(|e| CacheError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
