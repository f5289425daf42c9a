//! `[paths]` section configuration.
//!
//! Where asset files live on disk and how emitted URLs are formed.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! root = "public"                  # Directory app-relative asset paths map to
//! base = "/"                       # Application base path for direct links
//! handler = "/assets"              # Indirect-delivery endpoint path
//! url = "http://localhost:5277/"   # Absolute base for rewritten css urls
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigDiagnostics;

/// Asset locations and URL bases.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "paths")]
pub struct PathsConfig {
    /// Directory that app-relative asset paths (`~/css/site.css`) map to.
    pub root: PathBuf,

    /// Application base path prepended to relative direct links.
    #[config(inline_doc = "Application base path for direct links.")]
    pub base: String,

    /// Path of the indirect-delivery endpoint serving processed content.
    #[config(inline_doc = "Indirect-delivery endpoint path.")]
    pub handler: String,

    /// Absolute URL that relative `url(...)` references in stylesheets
    /// are resolved against.
    pub url: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            base: "/".into(),
            handler: "/assets".into(),
            url: "http://localhost:5277/".into(),
        }
    }
}

impl PathsConfig {
    /// Resolve `root` against the directory holding the config file.
    pub fn normalize(&mut self, config_dir: &Path) {
        let raw = self.root.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        self.root = if expanded.is_relative() {
            config_dir.join(expanded)
        } else {
            expanded
        };
    }

    /// Validate paths configuration.
    ///
    /// # Checks
    /// - `handler` must be an absolute URL path
    /// - `base` must be an absolute URL path
    /// - `url` must parse as an absolute URL
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.handler.starts_with('/') {
            diag.error_with_hint(
                Self::FIELDS.handler,
                format!("`{}` must start with `/`", self.handler),
                "e.g. handler = \"/assets\"",
            );
        }

        if !self.base.starts_with('/') {
            diag.error(
                Self::FIELDS.base,
                format!("`{}` must start with `/`", self.base),
            );
        }

        if let Err(e) = url::Url::parse(&self.url) {
            diag.error_with_hint(
                Self::FIELDS.url,
                format!("`{}` is not an absolute URL: {e}", self.url),
                "e.g. url = \"https://example.com/\"",
            );
        }
    }
}
