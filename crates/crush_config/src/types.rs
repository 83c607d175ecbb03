//! Configuration types deserialized from `crush.toml`.

use serde::Deserialize;
use std::fmt;

/// Default host of the Closure Compiler web service.
pub const DEFAULT_CLOSURE_HOST: &str = "closure-compiler.appspot.com";

/// The top-level configuration parsed from `crush.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CrushConfig {
    /// Where public assets and the bundle cache live.
    pub paths: PathsConfig,
    /// Remote Closure Compiler settings used for script bundles.
    #[serde(default)]
    pub closure: ClosureConfig,
}

/// Filesystem and URL layout of public assets.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Directory that asset sources are relative to (the web root).
    pub public_dir: String,
    /// Cache directory for compressed bundles, relative to `public_dir`.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// URL prefix used when rendering tags.
    #[serde(default = "default_asset_url")]
    pub asset_url: String,
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

fn default_asset_url() -> String {
    "/".to_string()
}

/// Settings for the Closure Compiler service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    /// Service host name.
    pub host: String,
    /// Service TCP port.
    pub port: u16,
    /// Request path of the compile endpoint.
    pub path: String,
    /// Connect/read/write timeout in seconds.
    pub timeout_secs: u64,
    /// How aggressively the service optimizes.
    pub compilation_level: CompilationLevel,
    /// How much the service warns.
    pub warning_level: WarningLevel,
    /// Ask the service to pretty-print its output.
    pub pretty_print: bool,
    /// Make the Closure Library available to the compiled code.
    pub use_closure_library: bool,
    /// Prepend a console banner with statistics, warnings and errors.
    pub debug: bool,
    /// When set, the service fetches each source from `prefix + source`
    /// instead of receiving the code inline.
    pub code_url_prefix: Option<String>,
    /// Optional `Referer` header value.
    pub referer: Option<String>,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CLOSURE_HOST.to_string(),
            port: 80,
            path: "/compile".to_string(),
            timeout_secs: 30,
            compilation_level: CompilationLevel::default(),
            warning_level: WarningLevel::default(),
            pretty_print: false,
            use_closure_library: true,
            debug: false,
            code_url_prefix: None,
            referer: None,
        }
    }
}

/// Closure Compiler optimization mode.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompilationLevel {
    /// Strip whitespace and comments only.
    WhitespaceOnly,
    /// Local renaming and dead-code removal (default).
    #[default]
    SimpleOptimizations,
    /// Whole-program optimization; may rename public symbols.
    AdvancedOptimizations,
}

impl CompilationLevel {
    /// Wire value of the `compilation_level` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            CompilationLevel::WhitespaceOnly => "WHITESPACE_ONLY",
            CompilationLevel::SimpleOptimizations => "SIMPLE_OPTIMIZATIONS",
            CompilationLevel::AdvancedOptimizations => "ADVANCED_OPTIMIZATIONS",
        }
    }
}

impl fmt::Display for CompilationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closure Compiler warning verbosity.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningLevel {
    /// No warnings.
    Quiet,
    /// The service's default set (default).
    #[default]
    Default,
    /// Every warning the service knows.
    Verbose,
}

impl WarningLevel {
    /// Wire value of the `warning_level` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            WarningLevel::Quiet => "QUIET",
            WarningLevel::Default => "DEFAULT",
            WarningLevel::Verbose => "VERBOSE",
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
