//! Modification-time staleness checks for cached bundles.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::CacheError;

/// Whether a cached bundle can be served as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// No cache file exists yet.
    Missing,
    /// The given source was modified after the cache file was written.
    Outdated {
        /// The first source found to be newer than the bundle.
        source: PathBuf,
    },
    /// The cache file is at least as new as every source.
    Fresh,
}

impl Staleness {
    /// Returns `true` if the bundle has to be (re)built.
    pub fn needs_compile(&self) -> bool {
        !matches!(self, Staleness::Fresh)
    }
}

/// Returns the modification time of `path`, or `None` if it does not exist.
pub fn modified_time(path: &Path) -> Result<Option<SystemTime>, CacheError> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Ok(Some(time)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Compares the bundle at `cache_path` against the sources it was built from.
///
/// A bundle is fresh iff its modification time is greater than or equal to
/// that of every source.
pub fn check_staleness(cache_path: &Path, sources: &[PathBuf]) -> Result<Staleness, CacheError> {
    let Some(cached_at) = modified_time(cache_path)? else {
        return Ok(Staleness::Missing);
    };

    for source in sources {
        let modified = modified_time(source)?.ok_or_else(|| CacheError::MissingSource {
            path: source.clone(),
        })?;
        if cached_at < modified {
            return Ok(Staleness::Outdated {
                source: source.clone(),
            });
        }
    }

    Ok(Staleness::Fresh)
}
