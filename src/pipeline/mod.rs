//! Content transform pipeline.
//!
//! A [`Pipeline`] is an ordered list of [`Transform`]s. Each one consumes the
//! previous output in full and returns a new ordered sequence.
//!
//! # Transforms
//!
//! | Transform        | Applies to | Effect                                      |
//! |------------------|------------|---------------------------------------------|
//! | [`CssUrlRewrite`] | css        | relative `url(...)` → absolute URL          |
//! | [`Combine`]      | any        | merge assets sharing a key                  |
//! | [`Minify`]       | any        | compress content, memoized                  |
//!
//! Assets that are not processable (external or explicitly ignored) pass
//! through every transform untouched, ahead of the transformed ones.

mod combine;
mod compress;
mod minify;
mod resolve;
mod rewrite;

pub use combine::Combine;
pub use compress::{Compressor, LightningCssCompressor, OxcCompressor, default_compressor};
pub use minify::{MemoCache, Minify};
pub use resolve::{BaseUrlResolver, UrlResolver};
pub use rewrite::CssUrlRewrite;

use std::sync::Arc;

use crate::asset::{Asset, AssetKind};
use crate::config::{AssetConfig, TransformKind};
use crate::error::Result;

/// One step of the pipeline.
pub trait Transform: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>>;
}

/// Ordered composition of transforms.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform.
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Pipeline listed in the kind's `transforms` setting, using the
    /// built-in compressor.
    pub fn for_kind(kind: AssetKind, config: &AssetConfig, memo: Option<MemoCache>) -> Result<Self> {
        Self::for_kind_with(kind, config, memo, default_compressor(kind))
    }

    pub fn for_kind_with(
        kind: AssetKind,
        config: &AssetConfig,
        memo: Option<MemoCache>,
        compressor: Arc<dyn Compressor>,
    ) -> Result<Self> {
        let settings = config.kind(kind);
        let mut pipeline = Self::new();

        for transform in settings.transforms {
            pipeline = match transform {
                TransformKind::Rewrite => {
                    let resolver = BaseUrlResolver::new(&config.paths.url)?;
                    pipeline.with(CssUrlRewrite::new(Arc::new(resolver)))
                }
                TransformKind::Combine => pipeline.with(Combine),
                TransformKind::Minify => {
                    let minify = Minify::new(kind, Arc::clone(&compressor), settings.locale);
                    match &memo {
                        Some(cache) => {
                            pipeline.with(minify.with_memo(Arc::clone(cache), config.cache.expiry()))
                        }
                        None => pipeline.with(minify),
                    }
                }
            };
        }

        Ok(pipeline)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Feed `assets` through every transform in order.
    pub fn run(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        self.transforms
            .iter()
            .try_fold(assets, |assets, transform| transform.apply(assets))
    }
}

/// Split into (untouched, processable), each keeping input order.
pub(crate) fn split_processable(assets: Vec<Asset>) -> (Vec<Asset>, Vec<Asset>) {
    assets
        .into_iter()
        .partition(|asset| !asset.is_processable())
}
