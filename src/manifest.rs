//! Page manifest: the declarations one page makes, as TOML.
//!
//! # Example
//!
//! ```toml
//! [[css]]
//! path = "~/css/site.css"
//! group = "head"
//! layout = true
//! media = "screen"
//! alternates = { cdn = "http://cdn.example.com/site.css" }
//! ie = { equality = "lt", browser = "IE 9" }
//!
//! [[javascript]]
//! path = "~/js/app.js"
//! remove = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::asset::{AssetBuilder, AssetKind, Conditional};
use crate::config::AssetConfig;
use crate::log;
use crate::manager::AssetManager;

/// Declarations of one page, per kind in file order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageManifest {
    pub css: Vec<Declaration>,
    pub javascript: Vec<Declaration>,
}

/// One `[[css]]` or `[[javascript]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Declaration {
    pub path: String,
    pub group: Option<String>,
    /// Declared by the layout page rather than the content page.
    pub layout: bool,
    pub media: Option<String>,
    pub ignore_processing: bool,
    pub alternate: Option<String>,
    pub alternates: BTreeMap<String, String>,
    pub ie: Option<Conditional>,
    /// Tombstone the asset instead of adding it.
    pub remove: bool,
}

impl PageManifest {
    /// Read a manifest, warning about unknown fields.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;

        let mut ignored = Vec::new();
        let manifest: Self = serde_ignored::deserialize(
            toml::Deserializer::new(&content),
            |field: serde_ignored::Path| ignored.push(field.to_string()),
        )
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), ignored.join(", "));
        }
        Ok(manifest)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Declarations of `kind`, in file order.
    pub fn declarations(&self, kind: AssetKind) -> &[Declaration] {
        match kind {
            AssetKind::Css => &self.css,
            AssetKind::Javascript => &self.javascript,
        }
    }

    /// Apply every declaration to `manager`: stylesheets first, then scripts.
    pub fn apply(&self, manager: &mut AssetManager) -> crate::error::Result<()> {
        let config = Arc::clone(manager.config());
        for kind in AssetKind::ALL {
            for decl in self.declarations(kind) {
                let builder = decl.builder(kind, &config);
                let group = decl.group.as_deref();
                if decl.remove {
                    builder.remove_from(manager, group)?;
                } else {
                    builder.add_to(manager, group)?;
                }
            }
        }
        Ok(())
    }
}

impl Declaration {
    fn builder<'a>(&self, kind: AssetKind, config: &'a AssetConfig) -> AssetBuilder<'a> {
        let mut builder = AssetBuilder::new(kind, self.path.as_str(), config);
        for (name, path) in &self.alternates {
            builder = builder.with_alternate_path(name, path);
        }
        if let Some(name) = &self.alternate {
            builder = builder.alternate(name);
        }
        if let Some(media) = &self.media {
            builder = builder.media(media);
        }
        if let Some(gate) = self.ie {
            builder = builder.for_ie(gate.equality, gate.browser);
        }
        if self.ignore_processing {
            builder = builder.ignore_processing();
        }
        if self.layout {
            builder = builder.on_layout_page();
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{BrowserVersion, Equality};
    use crate::asset::Asset;
    use crate::cache::{CachedContent, MemoryCache};
    use crate::config::test_config_at;
    use crate::error::AssetError;
    use tempfile::TempDir;

    fn manager() -> AssetManager {
        let config = Arc::new(test_config_at(Path::new(".")));
        AssetManager::new(
            config,
            Arc::new(MemoryCache::<CachedContent>::new()),
            Arc::new(MemoryCache::<Vec<Asset>>::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_full_declaration() {
        let manifest = PageManifest::from_str(
            r#"
            [[css]]
            path = "~/css/site.css"
            group = "head"
            layout = true
            media = "screen"
            alternate = "cdn"
            alternates = { cdn = "http://cdn.example.com/site.css" }
            ie = { equality = "lt", browser = "IE 9" }
            "#,
        )
        .unwrap();

        let decl = &manifest.css[0];
        assert_eq!(decl.group.as_deref(), Some("head"));
        assert!(decl.layout);
        assert!(!decl.remove);
        assert_eq!(
            decl.ie,
            Some(Conditional::new(Equality::LessThan, BrowserVersion::IE9))
        );
        assert!(manifest.javascript.is_empty());
    }

    #[test]
    fn test_apply_builds_assets() {
        let manifest = PageManifest::from_str(
            r#"
            [[css]]
            path = "~/css/site.css"
            group = "head"
            media = "print"
            alternate = "cdn"
            alternates = { cdn = "http://cdn.example.com/site.css" }

            [[javascript]]
            path = "~/js/app.js"
            layout = true
            "#,
        )
        .unwrap();

        let mut manager = manager();
        manifest.apply(&mut manager).unwrap();

        let css = manager.registry().render(AssetKind::Css, Some("head"));
        assert_eq!(css.len(), 1);
        assert_eq!(css[0].variant().media(), Some("print"));
        assert_eq!(css[0].current_path(), "http://cdn.example.com/site.css");

        let js = manager.registry().render(AssetKind::Javascript, None);
        assert_eq!(js.len(), 1);
        assert!(js[0].on_layout_page());
    }

    #[test]
    fn test_apply_remove_tombstones_later_adds() {
        let manifest = PageManifest::from_str(
            r#"
            [[javascript]]
            path = "~/js/a.js"

            [[javascript]]
            path = "~/js/a.js"
            remove = true

            [[javascript]]
            path = "~/js/a.js"
            "#,
        )
        .unwrap();

        let mut manager = manager();
        manifest.apply(&mut manager).unwrap();
        assert!(manager.registry().render(AssetKind::Javascript, None).is_empty());
    }

    #[test]
    fn test_apply_rejects_blank_path() {
        let manifest = PageManifest::from_str("[[css]]\nmedia = \"screen\"").unwrap();
        let err = manifest.apply(&mut manager()).unwrap_err();
        assert!(matches!(err, AssetError::InvalidArgument(_)));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = PageManifest::load(&dir.path().join("page.toml")).unwrap_err();
        assert!(err.to_string().contains("page.toml"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.toml");
        fs::write(&path, "[[javascript]]\npath = \"~/js/a.js\"\nextra = 1\n").unwrap();
        let manifest = PageManifest::load(&path).unwrap();
        assert_eq!(manifest.javascript[0].path, "~/js/a.js");
    }
}
