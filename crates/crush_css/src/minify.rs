//! The style bundle compressor.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use tracing::debug;

use crate::error::CssError;

/// Minifies concatenated stylesheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssCompressor;

impl CssCompressor {
    /// Creates a compressor with default parser and printer settings.
    pub fn new() -> Self {
        Self
    }

    /// Minifies `css` and returns the compact stylesheet text.
    ///
    /// # Errors
    ///
    /// Fails when the stylesheet does not parse or cannot be minified or
    /// printed; no partial output is produced.
    pub fn process(&self, css: &str) -> Result<String, CssError> {
        let mut stylesheet =
            StyleSheet::parse(css, ParserOptions::default()).map_err(|e| CssError::Parse {
                reason: e.to_string(),
            })?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| CssError::Minify {
                reason: e.to_string(),
            })?;

        let printer_options = PrinterOptions {
            minify: true,
            ..Default::default()
        };
        let printed = stylesheet
            .to_css(printer_options)
            .map_err(|e| CssError::Print {
                reason: e.to_string(),
            })?;

        debug!(
            input = css.len(),
            output = printed.code.len(),
            "minified stylesheet"
        );
        Ok(printed.code)
    }
}
