//! Relative `url(...)` rewriting for stylesheets.
//!
//! `url(img/bg.png)` in `~/css/site.css` becomes
//! `url(http://example.com/css/img/bg.png)`. Scheme-qualified and
//! root-relative references are left alone. The opening quote (if any) is
//! reused as the closing quote.

use regex::{Captures, Regex};
use std::sync::{Arc, LazyLock};

use super::{Transform, UrlResolver, split_processable};
use crate::asset::{Asset, AssetKind};
use crate::error::Result;
use crate::reader::MemoryReader;

/// `url(` + optional opening quote + target + optional closing quote + `)`.
static URL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\([ \t\r\n]*(['"]?)([^'")]*?)['"]?[ \t\r\n]*\)"#).unwrap()
});

/// `data:`, `http:`, `https:` ... prefixes.
static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Rewrites relative references in processable stylesheets.
pub struct CssUrlRewrite {
    resolver: Arc<dyn UrlResolver>,
}

impl CssUrlRewrite {
    pub fn new(resolver: Arc<dyn UrlResolver>) -> Self {
        Self { resolver }
    }

    fn rewrite(&self, asset_path: &str, content: &str) -> Result<String> {
        let mut out = String::with_capacity(content.len());
        let mut last = 0;

        for caps in URL_REFERENCE.captures_iter(content) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            out.push_str(&content[last..whole.start]);
            last = whole.end;

            match self.replacement(asset_path, &caps)? {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(&content[whole]),
            }
        }

        out.push_str(&content[last..]);
        Ok(out)
    }

    /// `None` keeps the match untouched.
    fn replacement(&self, asset_path: &str, caps: &Captures<'_>) -> Result<Option<String>> {
        let quote = caps.get(1).map_or("", |m| m.as_str());
        let target = caps.get(2).map_or("", |m| m.as_str()).trim();

        if target.is_empty() || target.starts_with('/') || SCHEME.is_match(target) {
            return Ok(None);
        }

        let absolute = self.resolver.resolve(asset_path, target)?;
        Ok(Some(format!("url({quote}{absolute}{quote})")))
    }
}

impl Transform for CssUrlRewrite {
    fn name(&self) -> &'static str {
        "rewrite"
    }

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        let (mut out, processable) = split_processable(assets);
        let (stylesheets, others): (Vec<_>, Vec<_>) = processable
            .into_iter()
            .partition(|asset| asset.kind() == AssetKind::Css);
        out.extend(others);

        for asset in stylesheets {
            let content = asset.reader().content()?;
            let rewritten = self.rewrite(asset.current_path(), &content)?;
            let paths = asset.reader().associated_paths().to_vec();
            out.push(asset.with_reader(MemoryReader::new(rewritten, paths).into()));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetBuilder, test_css, test_js};
    use crate::config::AssetConfig;

    const FAKE: &str = "http://FAKE-O.com/";

    /// Prefixes every reference with a fixed host.
    struct PrefixResolver;

    impl UrlResolver for PrefixResolver {
        fn resolve(&self, _asset_path: &str, relative: &str) -> Result<String> {
            Ok(format!("{FAKE}{relative}"))
        }
    }

    fn rewrite(content: &str) -> String {
        CssUrlRewrite::new(Arc::new(PrefixResolver))
            .rewrite("~/css/site.css", content)
            .unwrap()
    }

    fn in_memory(asset: Asset, content: &str) -> Asset {
        asset.with_reader(MemoryReader::new(content, vec!["site.css".into()]).into())
    }

    #[test]
    fn test_relative_reference_is_resolved() {
        let out = rewrite("body { background: url(a/url.png); }");
        assert_eq!(out, "body { background: url(http://FAKE-O.com/a/url.png); }");
    }

    #[test]
    fn test_absolute_references_untouched() {
        for input in [
            "body { background: url(/a/url.png); }",
            "body { background: url(http://domain.com/a/url.png); }",
            "body { background: url(data:image/png;base64,AAAA); }",
            "body { background: url(); }",
        ] {
            assert_eq!(rewrite(input), input);
        }
    }

    #[test]
    fn test_every_reference_rewritten() {
        let out = rewrite("body { background: url(a/url.png); background: url(b/url.png); }");
        assert!(out.contains("url(http://FAKE-O.com/a/url.png)"));
        assert!(out.contains("url(http://FAKE-O.com/b/url.png)"));
    }

    #[test]
    fn test_quotes_preserved() {
        let out = rewrite("body { background: url('a/url.png'); }");
        assert!(out.contains("url('http://FAKE-O.com/a/url.png')"));

        let out = rewrite("body { background: url(\"a/url.png\"); }");
        assert!(out.contains("url(\"http://FAKE-O.com/a/url.png\")"));
    }

    #[test]
    fn test_mixed_quotes_use_opening_quote() {
        let out = rewrite("body { background: url('a/url.png\"); }");
        assert!(out.contains("url('"));
        assert!(out.contains("')"));
        assert!(!out.contains('"'));
    }

    #[test]
    fn test_scripts_and_unprocessable_pass_through() {
        let config = AssetConfig::default();
        let ignored = in_memory(
            AssetBuilder::css("a.css", &config).ignore_processing().build().unwrap(),
            "a { background: url(a/url.png); }",
        );
        let script = in_memory(test_js("a.js"), "var u = 'url(a/url.png)';");

        let out = CssUrlRewrite::new(Arc::new(PrefixResolver))
            .apply(vec![ignored.clone(), script.clone()])
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].reader(), ignored.reader());
        assert_eq!(out[1].reader(), script.reader());
    }

    #[test]
    fn test_untouched_emitted_before_rewritten() {
        let rewritten = in_memory(test_css("a.css"), "a { background: url(x.png); }");
        let external = test_css("http://cdn.example.com/b.css");

        let out = CssUrlRewrite::new(Arc::new(PrefixResolver))
            .apply(vec![rewritten, external])
            .unwrap();

        assert_eq!(out[0].path(), "http://cdn.example.com/b.css");
        assert_eq!(out[1].path(), "a.css");
        assert!(out[1].is_in_memory());
        assert!(out[1].reader().content().unwrap().contains(FAKE));
        assert_eq!(out[1].reader().associated_paths(), ["site.css"]);
    }
}
