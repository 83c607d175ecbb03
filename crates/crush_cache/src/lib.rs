//! Compress-on-demand caching of style and script asset groups.
//!
//! Assets sharing the same rendering attributes are bundled together. Each
//! bundle is named by a fingerprint of its member output names and stored in
//! the cache directory; it is rebuilt whenever any member source is newer
//! than the cached file. Rendering emits one tag per bundle.

#![warn(missing_docs)]

pub mod asset;
pub mod bucket;
pub mod compressor;
pub mod container;
pub mod error;
pub mod manager;
pub mod render;
pub mod stale;
pub mod store;

pub use asset::{AssetEntry, AssetGroup, Attributes};
pub use bucket::{partition, AttributeBucket};
pub use compressor::{Compressor, SourceFile};
pub use container::{AssetContainer, AssetRegistry, DEFAULT_CONTAINER};
pub use error::CacheError;
pub use manager::{CacheManager, ResolvedBucket};
pub use stale::{check_staleness, Staleness};
pub use store::CacheStore;
