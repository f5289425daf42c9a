//! Registry plus one output stage per kind.

use std::sync::Arc;

use crate::asset::{Asset, AssetKind};
use crate::cache::ContentCache;
use crate::config::AssetConfig;
use crate::debug;
use crate::error::Result;
use crate::pipeline::{MemoCache, Pipeline};
use crate::registry::{Registry, group_name};
use crate::render::Renderer;

/// Pipeline and renderer for one kind.
pub struct OutputStage {
    pipeline: Pipeline,
    renderer: Renderer,
}

impl OutputStage {
    pub fn new(pipeline: Pipeline, renderer: Renderer) -> Self {
        Self { pipeline, renderer }
    }

    pub fn build_html(&self, assets: Vec<Asset>) -> Result<String> {
        let processed = self.pipeline.run(assets)?;
        self.renderer.render(processed)
    }
}

/// Collects declarations for one page and renders them per group.
pub struct AssetManager {
    config: Arc<AssetConfig>,
    registry: Registry,
    css: OutputStage,
    javascript: OutputStage,
}

impl AssetManager {
    /// Stages built from the settings, sharing both caches.
    pub fn new(config: Arc<AssetConfig>, content: ContentCache, memo: MemoCache) -> Result<Self> {
        let stage = |kind: AssetKind| -> Result<OutputStage> {
            Ok(OutputStage::new(
                Pipeline::for_kind(kind, &config, Some(Arc::clone(&memo)))?,
                Renderer::new(kind, &config, Arc::clone(&content)),
            ))
        };
        let css = stage(AssetKind::Css)?;
        let javascript = stage(AssetKind::Javascript)?;
        Ok(Self::with_stages(config, css, javascript))
    }

    pub fn with_stages(config: Arc<AssetConfig>, css: OutputStage, javascript: OutputStage) -> Self {
        Self {
            config,
            registry: Registry::new(),
            css,
            javascript,
        }
    }

    pub fn config(&self) -> &Arc<AssetConfig> {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn add(&mut self, asset: Asset, group: Option<&str>) {
        self.registry.add(asset, group);
    }

    pub fn remove(&mut self, asset: &Asset, group: Option<&str>) {
        self.registry.remove(asset, group);
    }

    /// Markup for `group`; empty groups render to `""` without processing.
    pub fn render(&self, kind: AssetKind, group: Option<&str>) -> Result<String> {
        let assets = self.registry.render(kind, group);
        if assets.is_empty() {
            return Ok(String::new());
        }

        debug!("render"; "{} {} assets in {}", assets.len(), kind, group_name(group));
        let stage = match kind {
            AssetKind::Css => &self.css,
            AssetKind::Javascript => &self.javascript,
        };
        stage.build_html(assets.to_vec())
    }
}
