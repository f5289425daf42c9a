//! `[css]` and `[javascript]` section configuration.
//!
//! Per-kind alternate name, transform list and compressor locale.
//!
//! # Example
//!
//! ```toml
//! [css]
//! alternate = "cdn"                              # Active alternate path name
//! transforms = ["rewrite", "combine", "minify"]  # Applied in this order
//! locale = "en-US"                               # Compressor locale
//!
//! [javascript]
//! transforms = ["combine", "minify"]
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ConfigDiagnostics, FieldPath};

/// A content transform that can appear in a kind's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Rewrite relative `url(...)` references to absolute URLs (css only).
    Rewrite,
    /// Merge assets sharing a key into one.
    Combine,
    /// Compress content, memoized in the shared cache.
    Minify,
}

impl TransformKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rewrite => "rewrite",
            Self::Combine => "combine",
            Self::Minify => "minify",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stylesheet settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "css")]
pub struct CssConfig {
    /// Alternate path name selected for stylesheets ("" = none).
    pub alternate: String,

    /// Transforms applied to stylesheets, in order.
    pub transforms: Vec<TransformKind>,

    /// Locale handed to the stylesheet compressor.
    #[config(inline_doc = "Compressor locale.")]
    pub locale: String,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            alternate: String::new(),
            transforms: vec![
                TransformKind::Rewrite,
                TransformKind::Combine,
                TransformKind::Minify,
            ],
            locale: "en-US".into(),
        }
    }
}

impl CssConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_transforms(&self.transforms, Self::FIELDS.transforms, true, diag);
        validate_locale(&self.locale, Self::FIELDS.locale, diag);
    }
}

/// Script settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "javascript")]
pub struct JavascriptConfig {
    /// Alternate path name selected for scripts ("" = none).
    pub alternate: String,

    /// Transforms applied to scripts, in order.
    pub transforms: Vec<TransformKind>,

    /// Locale handed to the script compressor (numeric literal formatting).
    #[config(inline_doc = "Compressor locale.")]
    pub locale: String,
}

impl Default for JavascriptConfig {
    fn default() -> Self {
        Self {
            alternate: String::new(),
            transforms: vec![TransformKind::Combine, TransformKind::Minify],
            locale: "en-US".into(),
        }
    }
}

impl JavascriptConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_transforms(&self.transforms, Self::FIELDS.transforms, false, diag);
        validate_locale(&self.locale, Self::FIELDS.locale, diag);
    }
}

fn validate_transforms(
    transforms: &[TransformKind],
    field: FieldPath,
    allow_rewrite: bool,
    diag: &mut ConfigDiagnostics,
) {
    for (i, transform) in transforms.iter().enumerate() {
        if transforms[..i].contains(transform) {
            diag.error(field, format!("`{transform}` is listed more than once"));
        }
    }

    if !allow_rewrite && transforms.contains(&TransformKind::Rewrite) {
        diag.error_with_hint(
            field,
            "`rewrite` only applies to stylesheets",
            "remove it from this list",
        );
    }
}

fn validate_locale(locale: &str, field: FieldPath, diag: &mut ConfigDiagnostics) {
    let valid = !locale.is_empty()
        && locale
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
    if !valid {
        diag.error_with_hint(
            field,
            format!("`{locale}` is not a locale tag"),
            "e.g. locale = \"en-US\"",
        );
    }
}
