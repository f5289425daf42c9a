//! Fluent asset declaration.
//!
//! ```ignore
//! AssetBuilder::css("~/css/site.css", &config)
//!     .media("screen")
//!     .for_ie(Equality::LessThan, BrowserVersion::IE9)
//!     .on_layout_page()
//!     .add_to(&mut manager, Some("head"))?;
//! ```

use std::collections::BTreeMap;

use super::{
    Asset, AssetKey, AssetKind, BrowserVersion, Conditional, Equality, Variant, is_external,
    resolve_current_path,
};
use crate::config::AssetConfig;
use crate::error::{AssetError, Result};
use crate::manager::AssetManager;
use crate::reader::FileReader;

/// Collects the fields of one declaration, validated by [`AssetBuilder::build`].
#[derive(Debug, Clone)]
pub struct AssetBuilder<'a> {
    config: &'a AssetConfig,
    variant: Variant,
    path: String,
    alternate_paths: BTreeMap<String, String>,
    alternate: Option<String>,
    conditional: Conditional,
    on_layout_page: bool,
    ignore_processing: bool,
}

impl<'a> AssetBuilder<'a> {
    pub fn css(path: impl Into<String>, config: &'a AssetConfig) -> Self {
        Self::new(AssetKind::Css, path, config)
    }

    pub fn javascript(path: impl Into<String>, config: &'a AssetConfig) -> Self {
        Self::new(AssetKind::Javascript, path, config)
    }

    pub fn new(kind: AssetKind, path: impl Into<String>, config: &'a AssetConfig) -> Self {
        Self {
            config,
            variant: Variant::from(kind),
            path: path.into(),
            alternate_paths: BTreeMap::new(),
            alternate: None,
            conditional: Conditional::default(),
            on_layout_page: false,
            ignore_processing: false,
        }
    }

    /// Register `path` under the alternate `name`. Blank values are ignored;
    /// a repeated name overwrites the earlier path.
    pub fn with_alternate_path(mut self, name: &str, path: &str) -> Self {
        let (name, path) = (name.trim(), path.trim());
        if !name.is_empty() && !path.is_empty() {
            self.alternate_paths.insert(name.to_string(), path.to_string());
        }
        self
    }

    /// Select an alternate for this asset, overriding the configured one.
    pub fn alternate(mut self, name: &str) -> Self {
        let name = name.trim();
        self.alternate = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn for_ie(mut self, equality: Equality, browser: BrowserVersion) -> Self {
        self.conditional = Conditional::new(equality, browser);
        self
    }

    /// Stylesheet `media` attribute. Blank values and scripts are ignored.
    pub fn media(mut self, media: &str) -> Self {
        let media = media.trim();
        if let Variant::Stylesheet { media: current } = &mut self.variant
            && !media.is_empty()
        {
            *current = media.to_string();
        }
        self
    }

    pub fn ignore_processing(mut self) -> Self {
        self.ignore_processing = true;
        self
    }

    pub fn on_layout_page(mut self) -> Self {
        self.on_layout_page = true;
        self
    }

    /// Validate and produce the asset, backed by a file reader.
    pub fn build(self) -> Result<Asset> {
        if self.path.trim().is_empty() {
            return Err(AssetError::invalid(
                "the param 'path' must be a non-empty string",
            ));
        }

        let kind = self.variant.kind();
        let alternate = self.alternate.or_else(|| {
            self.config
                .kind(kind)
                .alternate
                .map(ToString::to_string)
        });

        let current = resolve_current_path(&self.path, &self.alternate_paths, alternate.as_deref());
        let key = AssetKey {
            variant: self.variant.clone(),
            conditional: self.conditional,
            is_external: is_external(current),
        };
        let reader = FileReader::new(current, key.stable_hash(), &self.config.paths.root);

        let asset = Asset {
            variant: self.variant,
            path: self.path,
            alternate_paths: self.alternate_paths,
            alternate,
            conditional: self.conditional,
            on_layout_page: self.on_layout_page,
            ignore_processing: self.ignore_processing,
            reader: reader.into(),
        };
        Ok(asset)
    }

    /// Build and add to `group` (the default group when `None`).
    pub fn add_to(self, manager: &mut AssetManager, group: Option<&str>) -> Result<()> {
        manager.add(self.build()?, group);
        Ok(())
    }

    /// Build and tombstone in `group` (the default group when `None`).
    pub fn remove_from(self, manager: &mut AssetManager, group: Option<&str>) -> Result<()> {
        manager.remove(&self.build()?, group);
        Ok(())
    }
}
