//! Asset manager configuration (`assetry.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── cache      # [cache]
//! │   ├── kind       # [css], [javascript]
//! │   ├── paths      # [paths]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # AssetConfig (this file)
//! ```
//!
//! The loaded config is passed explicitly to everything that needs it;
//! there is no global handle.

pub mod section;
pub mod types;

pub use section::{
    CacheConfig, CssConfig, JavascriptConfig, PathsConfig, ServeConfig, TransformKind,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::{asset::AssetKind, log};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "assetry.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assetry.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Emit a provenance comment before every rendered link.
    pub debug: bool,

    /// Asset root and URL bases
    pub paths: PathsConfig,

    /// Stylesheet settings
    pub css: CssConfig,

    /// Script settings
    pub javascript: JavascriptConfig,

    /// Shared cache settings
    pub cache: CacheConfig,

    /// Delivery endpoint settings
    pub serve: ServeConfig,
}

/// Borrowed view of the settings for one asset kind.
#[derive(Debug, Clone, Copy)]
pub struct KindSettings<'a> {
    /// Configured alternate name, `None` when blank.
    pub alternate: Option<&'a str>,
    pub transforms: &'a [TransformKind],
    pub locale: &'a str,
}

impl AssetConfig {
    /// Load configuration from file path with unknown field detection.
    ///
    /// A missing file yields the defaults, rooted at the current directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
            let (config, ignored) = Self::parse_with_ignored(&content)?;
            if !ignored.is_empty() {
                Self::print_unknown_fields_warning(&ignored, path);
            }
            config
        } else {
            Self::default()
        };

        let config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| std::env::current_dir().unwrap_or_default(), Path::to_path_buf);

        config.config_path = path.to_path_buf();
        config.paths.normalize(&config_dir);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Validate every section, collecting all errors before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.css.validate(&mut diag);
        self.javascript.validate(&mut diag);
        self.cache.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Settings for one asset kind.
    pub fn kind(&self, kind: AssetKind) -> KindSettings<'_> {
        let (alternate, transforms, locale) = match kind {
            AssetKind::Css => (&self.css.alternate, &self.css.transforms, &self.css.locale),
            AssetKind::Javascript => (
                &self.javascript.alternate,
                &self.javascript.transforms,
                &self.javascript.locale,
            ),
        };
        KindSettings {
            alternate: Some(alternate.trim()).filter(|name| !name.is_empty()),
            transforms,
            locale,
        }
    }

    /// Generate a commented assetry.toml with every default value.
    pub fn template() -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "# assetry configuration file (v{})\n\n",
            env!("CARGO_PKG_VERSION")
        ));
        out.push_str("# Emit a provenance comment before every rendered link.\n");
        out.push_str("debug = false\n\n");

        out.push_str(&PathsConfig::template_with_header());
        out.push('\n');
        out.push_str(&CssConfig::template_with_header());
        out.push('\n');
        out.push_str(&JavascriptConfig::template_with_header());
        out.push('\n');
        out.push_str(&CacheConfig::template_with_header());
        out.push('\n');
        out.push_str(&ServeConfig::template_with_header());

        out
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config and panic on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AssetConfig {
    let (parsed, ignored) = AssetConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Default config whose asset root is `root`.
#[cfg(test)]
pub fn test_config_at(root: &Path) -> AssetConfig {
    let mut config = AssetConfig::default();
    config.paths.root = root.to_path_buf();
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = AssetConfig::from_str("[paths\nroot = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "debug = true\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = AssetConfig::parse_with_ignored(content).unwrap();
        assert!(config.debug);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_kind_settings_blank_alternate_is_none() {
        let mut config = AssetConfig::default();
        config.css.alternate = "  ".into();
        config.javascript.alternate = "cdn".into();
        assert_eq!(config.kind(AssetKind::Css).alternate, None);
        assert_eq!(config.kind(AssetKind::Javascript).alternate, Some("cdn"));
        assert_eq!(
            config.kind(AssetKind::Javascript).transforms,
            &[TransformKind::Combine, TransformKind::Minify]
        );
    }

    #[test]
    fn test_load_normalizes_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[paths]\nroot = \"public\"").unwrap();

        let config = AssetConfig::load(&path).unwrap();
        assert_eq!(config.paths.root, dir.path().join("public"));
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AssetConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert!(!config.debug);
        assert_eq!(config.paths.root, dir.path().join("."));
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[paths]\nhandler = \"assets\"\n[cache]\nexpiry = 0").unwrap();

        let err = AssetConfig::load(&path).unwrap_err();
        let diag = err.downcast_ref::<ConfigError>().unwrap();
        let ConfigError::Diagnostics(diag) = diag else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_template_parses_back_to_defaults() {
        let template = AssetConfig::template();
        assert!(template.contains("[paths]"));
        assert!(template.contains("[javascript]"));
        let config = test_parse_config(&template);
        assert_eq!(config.cache.expiry, 86400);
        assert_eq!(config.css.transforms, CssConfig::default().transforms);
    }
}
