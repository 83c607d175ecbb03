//! Stylesheet minification for style bundles.
//!
//! Thin wrapper over `lightningcss`: parse, apply its minification passes and
//! print the stylesheet back in minified form.

#![warn(missing_docs)]

pub mod error;
pub mod minify;

pub use error::CssError;
pub use minify::CssCompressor;
