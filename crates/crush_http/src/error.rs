//! Error types for the raw HTTP client.

/// Errors raised while talking to the remote compiler service.
///
/// None of these are retried: a failure aborts the compile request that
/// triggered it.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The connection could not be opened, or a read or write on it failed
    /// or timed out.
    #[error("connection to {addr} failed: {source}")]
    Connection {
        /// The `host:port` being contacted.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The response could not be framed (no head/body separator, bad status
    /// line, truncated body).
    #[error("malformed HTTP response: {reason}")]
    Protocol {
        /// Description of the framing problem.
        reason: String,
    },

    /// A chunked body could not be decoded.
    #[error("malformed chunk at byte {offset}: {reason}")]
    MalformedChunk {
        /// Offset into the body where decoding failed.
        offset: usize,
        /// Description of the chunk problem.
        reason: String,
    },
}
