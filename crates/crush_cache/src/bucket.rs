//! Partitioning of asset lists into attribute buckets.
//!
//! Assets can only share a bundle if they share a tag, so a group is split
//! into buckets of entries whose attribute maps are identical. Buckets are
//! recomputed on every resolution and never persisted.

use std::collections::HashMap;

use crush_common::{AssetKind, Fingerprint};
use tracing::debug;

use crate::asset::{AssetEntry, Attributes};

/// Entries of a group that share one attribute map.
#[derive(Debug, Clone)]
pub struct AttributeBucket<'a> {
    /// The shared attributes.
    pub attributes: &'a Attributes,
    /// Member entries, in their original order.
    pub entries: Vec<&'a AssetEntry>,
}

impl AttributeBucket<'_> {
    /// Output names of the members, e.g. `["a.js", "b.js"]`.
    pub fn output_names(&self, kind: AssetKind) -> Vec<String> {
        self.entries.iter().map(|e| e.output_name(kind)).collect()
    }

    /// The cache fingerprint of this bucket.
    pub fn fingerprint(&self, kind: AssetKind) -> Fingerprint {
        Fingerprint::from_outputs(self.output_names(kind))
    }
}

/// Splits `entries` into buckets by exact attribute match.
///
/// Buckets come out in the order their first member appears, and members
/// keep their relative order.
pub fn partition(entries: &[AssetEntry]) -> Vec<AttributeBucket<'_>> {
    let mut buckets: Vec<AttributeBucket<'_>> = Vec::new();
    let mut index: HashMap<&Attributes, usize> = HashMap::new();

    for entry in entries {
        let attributes = entry.attributes();
        match index.get(attributes) {
            Some(&i) => buckets[i].entries.push(entry),
            None => {
                index.insert(attributes, buckets.len());
                buckets.push(AttributeBucket {
                    attributes,
                    entries: vec![entry],
                });
            }
        }
    }

    debug!(
        entries = entries.len(),
        buckets = buckets.len(),
        "partitioned assets by attributes"
    );
    buckets
}
