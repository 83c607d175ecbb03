//! Error types for stylesheet minification.

/// Errors raised by the CSS library while minifying a bundle.
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    /// The concatenated stylesheet could not be parsed.
    #[error("failed to parse CSS: {reason}")]
    Parse {
        /// Parser diagnostic.
        reason: String,
    },

    /// A minification pass failed.
    #[error("failed to minify CSS: {reason}")]
    Minify {
        /// Minifier diagnostic.
        reason: String,
    },

    /// The minified stylesheet could not be printed.
    #[error("failed to print CSS: {reason}")]
    Print {
        /// Printer diagnostic.
        reason: String,
    },
}
