//! Stylesheet bundling with the built-in CSS minifier, driven from `crush.toml`.

use std::time::{Duration, SystemTime};

use crush_cache::{AssetRegistry, Attributes, CacheError, CacheManager};
use crush_common::{AssetKind, Fingerprint};
use crush_config::{load_config, CONFIG_FILE};
use crush_conformance::PublicDir;

fn media(value: &str) -> Attributes {
    [("media".to_string(), value.to_string())].into_iter().collect()
}

/// Writes a `crush.toml` next to a `public/` tree and loads it.
fn project() -> (tempfile::TempDir, CacheManager) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        r#"
[paths]
public_dir = "public"
cache_dir = "assets/cache"
asset_url = "https://static.example.com"
"#,
    )
    .unwrap();
    let public = dir.path().join("public/css");
    std::fs::create_dir_all(&public).unwrap();
    std::fs::write(public.join("reset.css"), "/* reset */\nbody {\n  margin: 0;\n}\n").unwrap();
    std::fs::write(public.join("site.css"), ".site  {  color : #ff0000 ; }\n").unwrap();
    std::fs::write(public.join("print.css"), "body { color: black }\n").unwrap();

    let config = load_config(dir.path()).unwrap();
    let manager = CacheManager::from_config(&config, dir.path());
    (dir, manager)
}

#[test]
fn styles_are_minified_into_one_bundle_per_media() {
    let (dir, manager) = project();
    let mut registry = AssetRegistry::new();
    registry
        .default_container()
        .add("reset", "css/reset.css", Attributes::new())
        .add("print", "css/print.css", media("print"))
        .add("site", "css/site.css", Attributes::new());

    let container = registry.get("default").unwrap();
    let html = container.styles(true, &manager).unwrap();

    let screen = Fingerprint::from_bytes(b"reset.css,site.css");
    let print = Fingerprint::from_bytes(b"print.css");
    assert_eq!(
        html,
        format!(
            "<link href=\"https://static.example.com/assets/cache/{screen}.css\" media=\"all\" type=\"text/css\" rel=\"stylesheet\">\n\
             <link href=\"https://static.example.com/assets/cache/{print}.css\" media=\"print\" type=\"text/css\" rel=\"stylesheet\">\n"
        )
    );

    let cache = dir.path().join("public/assets/cache");
    let bundle = std::fs::read_to_string(cache.join(format!("{screen}.css"))).unwrap();
    assert!(!bundle.contains("reset"));
    assert!(!bundle.contains('\n'));
    assert!(bundle.starts_with("body{margin:0}"));
    assert!(bundle.contains(".site{color:red}"));
}

#[test]
fn fresh_style_bundle_is_not_rewritten() {
    let (dir, manager) = project();
    let mut registry = AssetRegistry::new();
    registry
        .container("head")
        .add("site", "css/site.css", Attributes::new());
    let entries = registry.get("head").unwrap().group(AssetKind::Style).entries();

    let first = manager.resolve_buckets(AssetKind::Style, entries).unwrap();
    assert!(first[0].recompiled);

    let base = SystemTime::now() - Duration::from_secs(600);
    PublicDir::set_mtime(&dir.path().join("public/css/site.css"), base).unwrap();
    PublicDir::set_mtime(&first[0].cache_path, base).unwrap();

    let second = manager.resolve_buckets(AssetKind::Style, entries).unwrap();
    assert!(!second[0].recompiled);
    assert_eq!(second[0].url, first[0].url);
}

#[test]
fn invalid_css_fails_without_writing() {
    let (dir, manager) = project();
    std::fs::write(dir.path().join("public/css/broken.css"), ".a[ { color: red }").unwrap();
    let mut registry = AssetRegistry::new();
    registry
        .default_container()
        .add("broken", "css/broken.css", Attributes::new());

    let err = registry
        .get("default")
        .unwrap()
        .styles(true, &manager)
        .unwrap_err();
    assert!(matches!(err, CacheError::Css(_)));
    assert!(!dir.path().join("public/assets/cache").exists());
}

#[test]
fn uncompressed_styles_link_sources_under_asset_url() {
    let (_dir, manager) = project();
    let mut registry = AssetRegistry::new();
    registry
        .default_container()
        .add("site", "/css/site.css", media("screen"));

    let html = registry
        .get("default")
        .unwrap()
        .styles(false, &manager)
        .unwrap();
    assert_eq!(
        html,
        "<link href=\"https://static.example.com/css/site.css\" media=\"screen\" type=\"text/css\" rel=\"stylesheet\">\n"
    );
}
