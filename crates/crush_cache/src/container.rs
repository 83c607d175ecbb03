//! Named containers of registered styles and scripts.

use std::collections::BTreeMap;

use crush_common::AssetKind;

use crate::asset::{AssetEntry, AssetGroup, Attributes};
use crate::error::CacheError;
use crate::manager::CacheManager;
use crate::render;

/// Name of the container used when none is given.
pub const DEFAULT_CONTAINER: &str = "default";

/// A named pair of style and script groups.
#[derive(Debug, Clone)]
pub struct AssetContainer {
    name: String,
    styles: AssetGroup,
    scripts: AssetGroup,
}

impl AssetContainer {
    /// Creates an empty container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: AssetGroup::new(AssetKind::Style),
            scripts: AssetGroup::new(AssetKind::Script),
        }
    }

    /// The container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers an asset, routing it by the extension of `source`.
    ///
    /// Sources ending in `.css` are styles; everything else is a script.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        attributes: Attributes,
    ) -> &mut Self {
        let source = source.into();
        let entry = AssetEntry::new(name, source.clone(), attributes);
        self.group_mut(AssetKind::from_source(&source)).add(entry);
        self
    }

    /// Registers a stylesheet regardless of its extension.
    pub fn add_style(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        attributes: Attributes,
    ) -> &mut Self {
        self.styles.add(AssetEntry::new(name, source, attributes));
        self
    }

    /// Registers a script regardless of its extension.
    pub fn add_script(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
        attributes: Attributes,
    ) -> &mut Self {
        self.scripts.add(AssetEntry::new(name, source, attributes));
        self
    }

    /// The group holding assets of `kind`.
    pub fn group(&self, kind: AssetKind) -> &AssetGroup {
        match kind {
            AssetKind::Style => &self.styles,
            AssetKind::Script => &self.scripts,
        }
    }

    fn group_mut(&mut self, kind: AssetKind) -> &mut AssetGroup {
        match kind {
            AssetKind::Style => &mut self.styles,
            AssetKind::Script => &mut self.scripts,
        }
    }

    /// Renders the tags for the assets of `kind`.
    ///
    /// With `compress` the group goes through the cache manager and yields
    /// one tag per bundle. Without it every asset is referenced at its
    /// original URL. An empty group renders as an empty string either way.
    pub fn render(
        &self,
        kind: AssetKind,
        compress: bool,
        manager: &CacheManager,
    ) -> Result<String, CacheError> {
        let group = self.group(kind);
        if group.is_empty() {
            return Ok(String::new());
        }
        if compress {
            return manager.resolve(kind, group.entries());
        }

        let paths = manager.paths();
        Ok(group
            .entries()
            .iter()
            .map(|entry| render::tag(kind, &paths.source_url(entry.source()), entry.attributes()))
            .collect())
    }

    /// Shorthand for rendering the styles.
    pub fn styles(&self, compress: bool, manager: &CacheManager) -> Result<String, CacheError> {
        self.render(AssetKind::Style, compress, manager)
    }

    /// Shorthand for rendering the scripts.
    pub fn scripts(&self, compress: bool, manager: &CacheManager) -> Result<String, CacheError> {
        self.render(AssetKind::Script, compress, manager)
    }
}

/// Containers by name, created on first use.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    containers: BTreeMap<String, AssetContainer>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The container called `name`, created empty if it does not exist.
    pub fn container(&mut self, name: &str) -> &mut AssetContainer {
        self.containers
            .entry(name.to_string())
            .or_insert_with(|| AssetContainer::new(name))
    }

    /// The default container.
    pub fn default_container(&mut self) -> &mut AssetContainer {
        self.container(DEFAULT_CONTAINER)
    }

    /// Looks up a container without creating it.
    pub fn get(&self, name: &str) -> Option<&AssetContainer> {
        self.containers.get(name)
    }

    /// Names of all containers, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }
}
