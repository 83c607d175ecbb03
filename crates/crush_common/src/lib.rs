//! Shared foundational types used across the crush asset pipeline.
//!
//! This crate provides the cache fingerprint derived from an ordered list of
//! asset output names and the style/script asset kind used to pick file
//! extensions, tags and compressors.

#![warn(missing_docs)]

pub mod hash;
pub mod kind;

pub use hash::Fingerprint;
pub use kind::AssetKind;
