//! The two kinds of asset the pipeline knows how to bundle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an asset group holds stylesheets or scripts.
///
/// The kind decides the cache file extension, the tag used to reference the
/// bundle and which compressor processes the concatenated sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// CSS stylesheets, referenced with `<link>`.
    Style,
    /// JavaScript sources, referenced with `<script>`.
    Script,
}

impl AssetKind {
    /// File extension (without the dot) for bundles of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Style => "css",
            AssetKind::Script => "js",
        }
    }

    /// Infers the kind from a source path: `.css` is a style, anything else a script.
    pub fn from_source(source: &str) -> Self {
        let is_css = source
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("css"));
        if is_css {
            AssetKind::Style
        } else {
            AssetKind::Script
        }
    }

    /// Output name for an asset of this kind, e.g. `"app"` becomes `"app.js"`.
    pub fn output_name(self, asset_name: &str) -> String {
        format!("{asset_name}.{}", self.extension())
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Style => f.write_str("style"),
            AssetKind::Script => f.write_str("script"),
        }
    }
}
