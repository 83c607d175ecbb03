//! Minimal blocking HTTP/1.1 client for the remote compiler service.
//!
//! The client writes a single `POST` over a fresh TCP connection, reads until
//! the peer closes it, splits the head from the body and undoes chunked
//! transfer encoding. The chunked decoder and the response splitter are pure
//! functions over in-memory buffers so they can be tested without a network.

#![warn(missing_docs)]

pub mod chunked;
pub mod client;
pub mod error;
pub mod response;

pub use chunked::decode_chunked;
pub use client::RawHttpClient;
pub use error::HttpError;
pub use response::{parse_response, HttpResponse};
