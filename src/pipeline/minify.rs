//! Minification with memoization in the shared cache.
//!
//! The memo key covers the kind, the locale and every input asset's
//! fingerprint, in order. A hit returns the previously minified assets
//! without touching the compressor.

use std::sync::Arc;
use std::time::Duration;

use super::{Compressor, Transform, split_processable};
use crate::asset::{Asset, AssetKind};
use crate::cache::CachePort;
use crate::debug;
use crate::error::Result;
use crate::reader::{InvalidationPolicy, MemoryReader};
use crate::utils::hash::{ContentHash, Fingerprint};

/// Cache holding minified asset sequences.
pub type MemoCache = Arc<dyn CachePort<Vec<Asset>>>;

/// Replaces each processable asset's content with its minified form.
pub struct Minify {
    kind: AssetKind,
    compressor: Arc<dyn Compressor>,
    locale: String,
    memo: Option<(MemoCache, Duration)>,
}

impl Minify {
    pub fn new(kind: AssetKind, compressor: Arc<dyn Compressor>, locale: impl Into<String>) -> Self {
        Self {
            kind,
            compressor,
            locale: locale.into(),
            memo: None,
        }
    }

    /// Memoize results in `cache`, each entry living at most `expiry`.
    pub fn with_memo(mut self, cache: MemoCache, expiry: Duration) -> Self {
        self.memo = Some((cache, expiry));
        self
    }

    fn memo_key(&self, assets: &[Asset]) -> ContentHash {
        let mut fp = Fingerprint::new("minify");
        fp.field(self.kind.as_str()).field(&self.locale);
        for asset in assets {
            fp.hash(&asset.fingerprint());
        }
        fp.finish()
    }

    fn minify(&self, asset: Asset) -> Result<Asset> {
        let source = asset.reader().content()?;
        let minified: Arc<str> = if source.trim().is_empty() {
            source
        } else {
            self.compressor.compress(&source, &self.locale)?.into()
        };
        let paths = asset.reader().associated_paths().to_vec();
        Ok(asset.with_reader(MemoryReader::new(minified, paths).into()))
    }

    fn minify_all(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        assets.into_iter().map(|asset| self.minify(asset)).collect()
    }
}

impl Transform for Minify {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        let (mut out, processable) = split_processable(assets);
        let (targets, others): (Vec<_>, Vec<_>) = processable
            .into_iter()
            .partition(|asset| asset.kind() == self.kind);
        out.extend(others);

        if targets.is_empty() {
            return Ok(out);
        }

        let Some((cache, expiry)) = &self.memo else {
            out.extend(self.minify_all(targets)?);
            return Ok(out);
        };

        let key = self.memo_key(&targets);
        if let Some(cached) = cache.get(&key) {
            debug!("minify"; "memo hit {} ({} {} assets)", key, cached.len(), self.kind);
            out.extend(cached);
            return Ok(out);
        }
        debug!("minify"; "memo miss {} ({} {} assets)", key, targets.len(), self.kind);

        let policy = targets
            .iter()
            .fold(InvalidationPolicy::new(), |policy, asset| {
                policy.watch(asset.reader().invalidation_policy().watched().iter())
            })
            .with_ttl(*expiry);

        let minified = self.minify_all(targets)?;
        cache.insert(key, minified.clone(), &policy);
        out.extend(minified);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{test_css, test_js};
    use crate::cache::MemoryCache;
    use crate::error::AssetError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Uppercases its input and counts calls.
    #[derive(Default)]
    struct Shout {
        calls: AtomicUsize,
    }

    impl Compressor for Shout {
        fn compress(&self, source: &str, locale: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}@{locale}", source.to_uppercase()))
        }
    }

    struct Broken;

    impl Compressor for Broken {
        fn compress(&self, _source: &str, _locale: &str) -> Result<String> {
            Err(AssetError::Compress {
                kind: AssetKind::Javascript,
                message: "unexpected token".into(),
            })
        }
    }

    fn in_memory(asset: Asset, content: &str) -> Asset {
        asset.with_reader(MemoryReader::new(content, vec![]).into())
    }

    fn content(asset: &Asset) -> String {
        asset.reader().content().unwrap().to_string()
    }

    #[test]
    fn test_minifies_processable_assets() {
        let shout = Arc::new(Shout::default());
        let minify = Minify::new(AssetKind::Javascript, shout.clone(), "de-DE");

        let out = minify
            .apply(vec![
                in_memory(test_js("a.js"), "var a;"),
                test_js("http://cdn.example.com/lib.js"),
            ])
            .unwrap();

        assert_eq!(out[0].path(), "http://cdn.example.com/lib.js");
        assert_eq!(content(&out[1]), "VAR A;@de-DE");
        assert!(out[1].is_in_memory());
        assert_eq!(shout.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_blank_content_skips_compressor() {
        let shout = Arc::new(Shout::default());
        let minify = Minify::new(AssetKind::Css, shout.clone(), "en-US");

        let out = minify.apply(vec![in_memory(test_css("a.css"), "  \n")]).unwrap();

        assert_eq!(content(&out[0]), "  \n");
        assert_eq!(shout.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_memo_skips_recomputation() {
        let shout = Arc::new(Shout::default());
        let memo: MemoCache = Arc::new(MemoryCache::new());
        let minify = Minify::new(AssetKind::Css, shout.clone(), "en-US")
            .with_memo(memo, Duration::from_secs(60));
        let input = || vec![in_memory(test_css("a.css"), "a{}"), in_memory(test_css("b.css"), "b{}")];

        let first = minify.apply(input()).unwrap();
        let second = minify.apply(input()).unwrap();

        assert_eq!(shout.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.len(), second.len());
        assert_eq!(content(&second[0]), "A{}@en-US");
        assert_eq!(content(&second[1]), "B{}@en-US");
    }

    #[test]
    fn test_memo_distinguishes_content_and_locale() {
        let shout = Arc::new(Shout::default());
        let memo: MemoCache = Arc::new(MemoryCache::new());
        let en = Minify::new(AssetKind::Css, shout.clone(), "en-US")
            .with_memo(memo.clone(), Duration::from_secs(60));
        let de = Minify::new(AssetKind::Css, shout.clone(), "de-DE")
            .with_memo(memo, Duration::from_secs(60));

        en.apply(vec![in_memory(test_css("a.css"), "a{}")]).unwrap();
        en.apply(vec![in_memory(test_css("a.css"), "b{}")]).unwrap();
        de.apply(vec![in_memory(test_css("a.css"), "a{}")]).unwrap();

        assert_eq!(shout.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_expired_memo_recomputes() {
        let shout = Arc::new(Shout::default());
        let memo: MemoCache = Arc::new(MemoryCache::new());
        let minify =
            Minify::new(AssetKind::Css, shout.clone(), "en-US").with_memo(memo, Duration::ZERO);

        minify.apply(vec![in_memory(test_css("a.css"), "a{}")]).unwrap();
        minify.apply(vec![in_memory(test_css("a.css"), "a{}")]).unwrap();

        assert_eq!(shout.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_compressor_failure_propagates() {
        let minify = Minify::new(AssetKind::Javascript, Arc::new(Broken), "en-US");
        let err = minify
            .apply(vec![in_memory(test_js("a.js"), "function (")])
            .unwrap_err();
        assert!(matches!(err, AssetError::Compress { .. }));
    }
}
