//! Error types for remote compilation.

use crush_http::HttpError;

/// Errors that abort a remote compile request.
///
/// Compilation errors reported *by* the service are not represented here:
/// they are part of a successful [`CompileResponse`](crate::CompileResponse)
/// and end up in the debug banner.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The HTTP exchange with the service failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The service replied with something that is not a JSON object.
    #[error("compiler service returned an unusable response: {reason}")]
    Service {
        /// Description of the decoding failure.
        reason: String,
    },
}
