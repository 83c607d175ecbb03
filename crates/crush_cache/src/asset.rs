//! Asset entries and the ordered groups that hold them.

use std::collections::BTreeMap;

use crush_common::AssetKind;

/// Rendering attributes of an asset, kept sorted by key.
///
/// Sorting makes two attribute sets with the same pairs compare equal no
/// matter in which order they were supplied.
pub type Attributes = BTreeMap<String, String>;

/// A single registered asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    name: String,
    source: String,
    attributes: Attributes,
}

impl AssetEntry {
    /// Creates an entry named `name` for `source` (relative to the public directory).
    pub fn new(name: impl Into<String>, source: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            attributes,
        }
    }

    /// The unique name of the asset within its group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source path relative to the public directory.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The rendering attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The name this asset contributes to a bundle fingerprint, e.g. `"app.js"`.
    pub fn output_name(&self, kind: AssetKind) -> String {
        kind.output_name(&self.name)
    }
}

/// An insertion-ordered set of assets of one kind, keyed by name.
#[derive(Debug, Clone)]
pub struct AssetGroup {
    kind: AssetKind,
    entries: Vec<AssetEntry>,
}

impl AssetGroup {
    /// Creates an empty group of the given kind.
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// The kind of every asset in this group.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Adds an entry at the end of the group.
    ///
    /// An entry whose name is already present replaces the existing one in
    /// place, keeping its original position.
    pub fn add(&mut self, entry: AssetEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&AssetEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The entries in insertion order.
    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the group has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
