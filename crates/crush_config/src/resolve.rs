//! Path resolution: turning configured directories into concrete locations.

use crate::types::CrushConfig;
use std::path::{Path, PathBuf};

/// Filesystem locations and URL prefixes derived from a [`CrushConfig`].
///
/// Relative `public_dir` values are resolved against the project directory.
/// The cache directory always lives under the public directory so that the
/// bundles it holds are served alongside the original assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Directory asset sources are relative to.
    pub public_dir: PathBuf,
    /// Directory compressed bundles are written to.
    pub cache_dir_path: PathBuf,
    /// URL prefix for original assets, always ending in `/`.
    pub asset_url: String,
    /// URL prefix for cached bundles, always ending in `/`.
    pub cache_url_prefix: String,
}

impl ResolvedPaths {
    /// Builds resolved paths directly from a public directory and cache directory name.
    pub fn new(public_dir: &Path, cache_dir: &str, asset_url: &str) -> Self {
        let cache_dir = cache_dir.trim_matches('/');
        let asset_url = with_trailing_slash(asset_url);
        Self {
            public_dir: public_dir.to_path_buf(),
            cache_dir_path: public_dir.join(cache_dir),
            cache_url_prefix: format!("{asset_url}{cache_dir}/"),
            asset_url,
        }
    }

    /// On-disk location of a source given relative to the public directory.
    pub fn source_path(&self, source: &str) -> PathBuf {
        self.public_dir.join(source.trim_start_matches('/'))
    }

    /// URL of an original (uncompressed) asset.
    pub fn source_url(&self, source: &str) -> String {
        format!("{}{}", self.asset_url, source.trim_start_matches('/'))
    }

    /// URL of a cached bundle file.
    pub fn cache_url(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.cache_url_prefix)
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Resolves the configured directories relative to `project_dir`.
pub fn resolve_paths(config: &CrushConfig, project_dir: &Path) -> ResolvedPaths {
    let public_dir = Path::new(&config.paths.public_dir);
    // Absolute public dirs are kept as-is by `join`.
    let public_dir = project_dir.join(public_dir);
    ResolvedPaths::new(
        &public_dir,
        &config.paths.cache_dir,
        &config.paths.asset_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn resolve_relative_public_dir() {
        let config = load_config_from_str("[paths]\npublic_dir = \"public\"\n").unwrap();
        let paths = resolve_paths(&config, Path::new("/srv/site"));
        assert_eq!(paths.public_dir, PathBuf::from("/srv/site/public"));
        assert_eq!(paths.cache_dir_path, PathBuf::from("/srv/site/public/cache"));
        assert_eq!(paths.cache_url_prefix, "/cache/");
    }

    #[test]
    fn resolve_absolute_public_dir() {
        let config = load_config_from_str("[paths]\npublic_dir = \"/var/www\"\n").unwrap();
        let paths = resolve_paths(&config, Path::new("/srv/site"));
        assert_eq!(paths.public_dir, PathBuf::from("/var/www"));
    }

    #[test]
    fn cache_url_uses_asset_url() {
        let toml = r#"
[paths]
public_dir = "public"
cache_dir = "/build/cache/"
asset_url = "https://cdn.example.com"
"#;
        let config = load_config_from_str(toml).unwrap();
        let paths = resolve_paths(&config, Path::new("/srv"));
        assert_eq!(paths.cache_url_prefix, "https://cdn.example.com/build/cache/");
        assert_eq!(
            paths.cache_dir_path,
            PathBuf::from("/srv/public/build/cache")
        );
        assert_eq!(
            paths.cache_url("0123456789abcdef.js"),
            "https://cdn.example.com/build/cache/0123456789abcdef.js"
        );
    }

    #[test]
    fn source_helpers_strip_leading_slash() {
        let paths = ResolvedPaths::new(Path::new("/srv/public"), "cache", "/");
        assert_eq!(
            paths.source_path("/js/a.js"),
            PathBuf::from("/srv/public/js/a.js")
        );
        assert_eq!(paths.source_url("/js/a.js"), "/js/a.js");
        assert_eq!(paths.source_url("js/a.js"), "/js/a.js");
    }
}
