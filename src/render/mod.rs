//! Final markup for a processed asset sequence.
//!
//! Layout-page assets come first; each class keeps its relative order.
//! Pipeline-produced (in-memory) content is published to the shared cache
//! under its fingerprint and linked indirectly through the delivery
//! endpoint; file-backed assets are linked directly.

pub mod html;

use std::time::Duration;

use crate::asset::{Asset, AssetKind, is_external};
use crate::cache::{CachedContent, ContentCache};
use crate::config::AssetConfig;
use crate::debug;
use crate::error::Result;
use crate::utils::hash::ContentHash;

/// Renders assets of one kind.
pub struct Renderer {
    kind: AssetKind,
    cache: ContentCache,
    handler: String,
    base: String,
    debug: bool,
    expiry: Duration,
}

impl Renderer {
    pub fn new(kind: AssetKind, config: &AssetConfig, cache: ContentCache) -> Self {
        Self {
            kind,
            cache,
            handler: config.paths.handler.clone(),
            base: config.paths.base.clone(),
            debug: config.debug,
            expiry: config.cache.expiry(),
        }
    }

    /// Markup for `assets`, one newline-terminated line per tag.
    pub fn render(&self, mut assets: Vec<Asset>) -> Result<String> {
        assets.sort_by_key(|asset| !asset.on_layout_page());

        let mut out = String::new();
        for asset in &assets {
            let url = if asset.is_in_memory() {
                let key = self.publish(asset)?;
                self.indirect_url(&key)
            } else {
                self.direct_url(asset.current_path())
            };

            if self.debug {
                html::push_debug_comment(&mut out, asset.reader().associated_paths());
            }
            html::push_gated(&mut out, &asset.conditional(), &html::link(asset.variant(), &url));
        }
        Ok(out)
    }

    /// Store in-memory content under its fingerprint, never replacing a
    /// fresh entry.
    fn publish(&self, asset: &Asset) -> Result<ContentHash> {
        let reader = asset.reader();
        let key = reader.fingerprint();
        if !self.cache.contains(&key) {
            let content = CachedContent::new(reader.content()?, self.kind);
            let policy = reader.invalidation_policy().or_ttl(self.expiry);
            if self.cache.insert(key, content, &policy) {
                debug!("cache"; "published {} {}", self.kind, key);
            }
        }
        Ok(key)
    }

    fn indirect_url(&self, key: &ContentHash) -> String {
        format!(
            "{}?type={}&key={}",
            self.handler,
            self.kind.as_str(),
            key.to_hex()
        )
    }

    /// External and `/`-rooted paths are kept; `~/x` and `x` hang off the
    /// application base.
    fn direct_url(&self, path: &str) -> String {
        if is_external(path) || path.starts_with('/') {
            return path.to_string();
        }
        let relative = path.strip_prefix("~/").unwrap_or(path);
        format!("{}/{}", self.base.trim_end_matches('/'), relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetBuilder, BrowserVersion, Equality, test_css, test_js};
    use crate::cache::{CachePort, MemoryCache};
    use crate::reader::MemoryReader;
    use std::sync::Arc;

    fn setup(kind: AssetKind, config: &AssetConfig) -> (Renderer, Arc<MemoryCache<CachedContent>>) {
        let cache = Arc::new(MemoryCache::new());
        (Renderer::new(kind, config, cache.clone()), cache)
    }

    fn in_memory(asset: Asset, content: &str) -> Asset {
        let paths = vec![format!("/srv/{}", asset.path())];
        asset.with_reader(MemoryReader::new(content, paths).into())
    }

    #[test]
    fn test_direct_urls() {
        let (renderer, _) = setup(AssetKind::Css, &AssetConfig::default());
        assert_eq!(renderer.direct_url("~/css/a.css"), "/css/a.css");
        assert_eq!(renderer.direct_url("css/a.css"), "/css/a.css");
        assert_eq!(renderer.direct_url("/css/a.css"), "/css/a.css");
        assert_eq!(renderer.direct_url("://onLayout1"), "://onLayout1");
        assert_eq!(
            renderer.direct_url("http://cdn.example.com/a.css"),
            "http://cdn.example.com/a.css"
        );

        let mut config = AssetConfig::default();
        config.paths.base = "/app/".into();
        let (renderer, _) = setup(AssetKind::Css, &config);
        assert_eq!(renderer.direct_url("~/css/a.css"), "/app/css/a.css");
    }

    #[test]
    fn test_declaration_order_kept_without_layout_flags() {
        let (renderer, _) = setup(AssetKind::Css, &AssetConfig::default());
        let assets = vec![
            test_css("://notOnLayout1"),
            test_css("://onLayout1"),
            test_css("://notOnLayout2"),
            test_css("://onLayout2"),
        ];

        let out = renderer.render(assets).unwrap();

        let position = |needle: &str| out.find(needle).unwrap();
        assert!(position("notOnLayout1") < position("://onLayout1"));
        assert!(position("://onLayout1") < position("notOnLayout2"));
        assert!(position("notOnLayout2") < position("://onLayout2"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_layout_assets_first_and_stable() {
        let (renderer, _) = setup(AssetKind::Css, &AssetConfig::default());
        let assets = vec![
            test_css("/off1.css"),
            test_css("/on1.css").promoted(),
            test_css("/off2.css"),
            test_css("/on2.css").promoted(),
        ];

        let out = renderer.render(assets).unwrap();

        let order: Vec<_> = out
            .lines()
            .map(|line| line.split('"').nth(1).unwrap())
            .collect();
        assert_eq!(order, ["/on1.css", "/on2.css", "/off1.css", "/off2.css"]);
    }

    #[test]
    fn test_stylesheet_markup() {
        let config = AssetConfig::default();
        let (renderer, _) = setup(AssetKind::Css, &config);
        let asset = AssetBuilder::css("~/css/print.css", &config)
            .media("print")
            .build()
            .unwrap();
        assert_eq!(
            renderer.render(vec![asset]).unwrap(),
            "<link href=\"/css/print.css\" media=\"print\" rel=\"stylesheet\" type=\"text/css\" />\n"
        );
    }

    #[test]
    fn test_in_memory_published_and_linked_indirectly() {
        let (renderer, cache) = setup(AssetKind::Javascript, &AssetConfig::default());
        let asset = in_memory(test_js("a.js"), "var a;");
        let key = asset.reader().fingerprint();

        let out = renderer.render(vec![asset]).unwrap();

        assert_eq!(
            out,
            format!(
                "<script src=\"/assets?type=javascript&amp;key={}\" type=\"text/javascript\"></script>\n",
                key.to_hex()
            )
        );
        let cached = cache.get(&key).unwrap();
        assert_eq!(&*cached.content, "var a;");
        assert_eq!(cached.kind, AssetKind::Javascript);
    }

    #[test]
    fn test_publish_is_idempotent() {
        let (renderer, cache) = setup(AssetKind::Css, &AssetConfig::default());

        let first = renderer.render(vec![in_memory(test_css("a.css"), "a{}")]).unwrap();
        let second = renderer.render(vec![in_memory(test_css("a.css"), "a{}")]).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_conditional_wrapped_once() {
        let config = AssetConfig::default();
        let (renderer, _) = setup(AssetKind::Css, &config);
        let gated = AssetBuilder::css("~/css/ie.css", &config)
            .for_ie(Equality::LessThan, BrowserVersion::IE9)
            .build()
            .unwrap();

        let out = renderer.render(vec![gated, test_css("~/css/site.css")]).unwrap();

        assert_eq!(out.matches("<!--[if lt IE 9]>").count(), 1);
        assert_eq!(out.matches("<![endif]-->").count(), 1);
        let open = out.find("<!--[if").unwrap();
        let link = out.find("ie.css").unwrap();
        let close = out.find("<![endif]-->").unwrap();
        assert!(open < link && link < close);
        assert_eq!(out[open..close].matches("<link").count(), 1);
    }

    #[test]
    fn test_debug_comment_precedes_link() {
        let mut config = AssetConfig::default();
        config.debug = true;
        let (renderer, _) = setup(AssetKind::Css, &config);
        let combined = test_css("a.css").with_reader(
            MemoryReader::new("a{}b{}", vec!["/srv/a.css".into(), "/srv/b.css".into()]).into(),
        );

        let out = renderer.render(vec![combined]).unwrap();

        assert!(out.starts_with("<!-- Assets:\n/srv/a.css\n/srv/b.css\n -->\n<link "));
    }
}
