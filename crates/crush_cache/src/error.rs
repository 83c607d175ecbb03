//! Error types for cache resolution.

use std::path::PathBuf;

use crush_closure::CompileError;
use crush_css::CssError;

/// Errors that abort the resolution of an asset group.
///
/// Nothing here is recovered locally: a failure means no markup is produced
/// for the group and the caller decides what to do with the request or build.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An asset points at a source file that does not exist.
    #[error("the asset you are trying to compress does not exist ({path})")]
    MissingSource {
        /// The resolved on-disk path that was looked up.
        path: PathBuf,
    },

    /// An I/O error occurred while reading sources or writing the cache.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The remote script compiler failed.
    #[error("script compression failed: {0}")]
    Compile(#[from] CompileError),

    /// The stylesheet minifier failed.
    #[error("style compression failed: {0}")]
    Css(#[from] CssError),
}
