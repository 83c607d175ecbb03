//! The seam between bundle resolution and the minifiers.

use std::path::PathBuf;

use crush_closure::{RemoteCompiler, ScriptSource};
use crush_css::CssCompressor;

use crate::error::CacheError;

/// A source file loaded for compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the public directory, as registered.
    pub public_path: String,
    /// Resolved location on disk.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Turns the ordered sources of one bundle into its compressed text.
pub trait Compressor {
    /// Compresses `sources`, which are concatenated in the given order.
    fn compress(&self, sources: &[SourceFile]) -> Result<String, CacheError>;
}

impl Compressor for CssCompressor {
    fn compress(&self, sources: &[SourceFile]) -> Result<String, CacheError> {
        let combined: String = sources.iter().map(|s| s.contents.as_str()).collect();
        Ok(self.process(&combined)?)
    }
}

impl Compressor for RemoteCompiler {
    fn compress(&self, sources: &[SourceFile]) -> Result<String, CacheError> {
        let scripts: Vec<ScriptSource> = sources
            .iter()
            .map(|s| ScriptSource::new(s.public_path.clone(), s.contents.clone()))
            .collect();
        Ok(RemoteCompiler::compress(self, &scripts)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, contents: &str) -> SourceFile {
        SourceFile {
            public_path: format!("css/{name}"),
            path: PathBuf::from(format!("/srv/public/css/{name}")),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn css_sources_are_concatenated_in_order() {
        let sources = vec![
            source("reset.css", "body { margin: 0 }\n"),
            source("site.css", ".site { color: blue }\n"),
        ];
        let out = Compressor::compress(&CssCompressor::new(), &sources).unwrap();
        let body = out.find("body{").unwrap();
        let site = out.find(".site{").unwrap();
        assert!(body < site);
    }

    #[test]
    fn css_failure_is_cache_error() {
        let sources = vec![source("bad.css", ".a[ { color: red }")];
        let err = Compressor::compress(&CssCompressor::new(), &sources).unwrap_err();
        assert!(matches!(err, CacheError::Css(_)));
    }
}
