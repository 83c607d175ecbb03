//! High-level bundle resolution.
//!
//! The `CacheManager` ties together attribute bucketing, fingerprinting, the
//! bundle store, staleness checks and the per-kind compressors. Resolving a
//! group yields one tag per attribute bucket, each pointing at a cached
//! bundle that is rebuilt first if any of its sources changed.

use std::path::{Path, PathBuf};

use crush_closure::RemoteCompiler;
use crush_common::{AssetKind, Fingerprint};
use crush_config::{resolve_paths, CrushConfig, ResolvedPaths};
use crush_css::CssCompressor;
use tracing::{debug, info, warn};

use crate::asset::{AssetEntry, Attributes};
use crate::bucket::partition;
use crate::compressor::{Compressor, SourceFile};
use crate::error::CacheError;
use crate::render;
use crate::stale::check_staleness;
use crate::store::CacheStore;

/// A bucket after resolution: where its bundle lives and how to reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBucket {
    /// Kind of the bundle.
    pub kind: AssetKind,
    /// Fingerprint naming the bundle.
    pub fingerprint: Fingerprint,
    /// Bundle location on disk.
    pub cache_path: PathBuf,
    /// Bundle URL for the rendered tag.
    pub url: String,
    /// Attributes shared by every member, rendered on the tag.
    pub attributes: Attributes,
    /// Whether the bundle was (re)built during this resolution.
    pub recompiled: bool,
}

impl ResolvedBucket {
    /// The tag referencing this bundle.
    pub fn render(&self) -> String {
        render::tag(self.kind, &self.url, &self.attributes)
    }
}

/// A bucket whose sources have all been located, ready to be checked and built.
struct BucketPlan<'a> {
    attributes: &'a Attributes,
    fingerprint: Fingerprint,
    sources: Vec<(&'a str, PathBuf)>,
}

/// Resolves asset lists to cached, compressed bundles.
///
/// Holds one compressor per asset kind; the kind of the group being resolved
/// picks which one runs.
pub struct CacheManager {
    paths: ResolvedPaths,
    store: CacheStore,
    styles: Box<dyn Compressor>,
    scripts: Box<dyn Compressor>,
}

impl CacheManager {
    /// Creates a manager with explicit compressors.
    pub fn new(
        paths: ResolvedPaths,
        styles: Box<dyn Compressor>,
        scripts: Box<dyn Compressor>,
    ) -> Self {
        let store = CacheStore::new(&paths.cache_dir_path);
        Self {
            paths,
            store,
            styles,
            scripts,
        }
    }

    /// Creates a manager using `lightningcss` for styles and the remote
    /// Closure Compiler for scripts, as configured.
    pub fn from_config(config: &CrushConfig, project_dir: &Path) -> Self {
        Self::new(
            resolve_paths(config, project_dir),
            Box::new(CssCompressor::new()),
            Box::new(RemoteCompiler::from_config(&config.closure)),
        )
    }

    /// The resolved directories and URL prefixes.
    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// The bundle store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    fn compressor(&self, kind: AssetKind) -> &dyn Compressor {
        match kind {
            AssetKind::Style => self.styles.as_ref(),
            AssetKind::Script => self.scripts.as_ref(),
        }
    }

    /// Resolves `entries` and renders one tag per bundle.
    pub fn resolve(&self, kind: AssetKind, entries: &[AssetEntry]) -> Result<String, CacheError> {
        Ok(self
            .resolve_buckets(kind, entries)?
            .iter()
            .map(ResolvedBucket::render)
            .collect())
    }

    /// Resolves `entries` to bundles, rebuilding the stale ones.
    ///
    /// Every source of every bucket is located before anything is compiled,
    /// so a missing source fails the whole group without touching the cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::MissingSource`] if any asset's source is absent;
    /// [`CacheError::Io`] for read/write failures; compressor errors as
    /// [`CacheError::Compile`] or [`CacheError::Css`].
    pub fn resolve_buckets(
        &self,
        kind: AssetKind,
        entries: &[AssetEntry],
    ) -> Result<Vec<ResolvedBucket>, CacheError> {
        let mut plans = Vec::new();
        for bucket in partition(entries) {
            let mut sources = Vec::with_capacity(bucket.entries.len());
            for entry in &bucket.entries {
                let path = self.paths.source_path(entry.source());
                if !path.is_file() {
                    return Err(CacheError::MissingSource { path });
                }
                sources.push((entry.source(), path));
            }
            plans.push(BucketPlan {
                attributes: bucket.attributes,
                fingerprint: bucket.fingerprint(kind),
                sources,
            });
        }

        let mut resolved = Vec::with_capacity(plans.len());
        for plan in plans {
            if plan.sources.is_empty() {
                debug!(%kind, "skipping empty bucket");
                continue;
            }
            resolved.push(self.resolve_plan(kind, plan)?);
        }
        Ok(resolved)
    }

    fn resolve_plan(&self, kind: AssetKind, plan: BucketPlan<'_>) -> Result<ResolvedBucket, CacheError> {
        let cache_path = self.store.entry_path(&plan.fingerprint, kind);
        let source_paths: Vec<PathBuf> = plan.sources.iter().map(|(_, p)| p.clone()).collect();
        let staleness = check_staleness(&cache_path, &source_paths)?;

        let recompiled = staleness.needs_compile();
        if recompiled {
            let mut files = Vec::with_capacity(plan.sources.len());
            for (public_path, path) in &plan.sources {
                let bytes = std::fs::read(path).map_err(|e| CacheError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                // Undecodable bytes (e.g. Latin-1 comments) become U+FFFD.
                let contents = match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(path = %path.display(), "source is not valid UTF-8");
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                };
                files.push(SourceFile {
                    public_path: public_path.to_string(),
                    path: path.clone(),
                    contents,
                });
            }

            let output = self.compressor(kind).compress(&files)?;
            self.store.write_entry(&plan.fingerprint, kind, &output)?;
            info!(
                %kind,
                fingerprint = %plan.fingerprint,
                sources = files.len(),
                reason = ?staleness,
                "rebuilt bundle"
            );
        } else {
            debug!(%kind, fingerprint = %plan.fingerprint, "bundle is fresh");
        }

        let file_name = CacheStore::file_name(&plan.fingerprint, kind);
        Ok(ResolvedBucket {
            kind,
            fingerprint: plan.fingerprint,
            cache_path,
            url: self.paths.cache_url(&file_name),
            attributes: plan.attributes.clone(),
            recompiled,
        })
    }

    /// Deletes bundles of `kind` not referenced by `resolved`.
    ///
    /// Returns the number of files removed.
    pub fn prune(&self, kind: AssetKind, resolved: &[ResolvedBucket]) -> Result<usize, CacheError> {
        let live: Vec<Fingerprint> = resolved
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.fingerprint)
            .collect();
        self.store.gc(kind, &live)
    }
}
