//! Parsing and validation of `crush.toml` configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`CrushConfig`] describing where assets and the cache live and how the remote
//! Closure Compiler service is reached.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_paths, ResolvedPaths};
pub use types::*;
