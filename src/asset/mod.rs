//! Asset declarations: kind, identity, key and the fluent builder.
//!
//! An [`Asset`] is one declared stylesheet or script reference. Its
//! identity ([`AssetIdentity`]) drives deduplication inside a group, its
//! key ([`AssetKey`]) drives combination in the pipeline.

mod builder;
mod conditional;
mod key;
mod kind;

pub use builder::AssetBuilder;
pub use conditional::{BrowserVersion, CONDITIONAL_CLOSE, Conditional, Equality};
pub use key::{AssetIdentity, AssetKey};
pub use kind::{AssetKind, DEFAULT_MEDIA, Variant};

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::reader::ContentReader;
use crate::utils::hash::{ContentHash, Fingerprint};

/// One declared stylesheet or script.
///
/// Equality and hashing go through [`Asset::identity`], so two declarations
/// that differ only in layout flag, alternates or reader compare equal.
#[derive(Debug, Clone)]
pub struct Asset {
    pub(crate) variant: Variant,
    pub(crate) path: String,
    pub(crate) alternate_paths: BTreeMap<String, String>,
    /// Alternate name selected when the asset was built.
    pub(crate) alternate: Option<String>,
    pub(crate) conditional: Conditional,
    pub(crate) on_layout_page: bool,
    pub(crate) ignore_processing: bool,
    pub(crate) reader: ContentReader,
}

impl Asset {
    pub const fn kind(&self) -> AssetKind {
        self.variant.kind()
    }

    pub const fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn alternate_paths(&self) -> &BTreeMap<String, String> {
        &self.alternate_paths
    }

    pub fn alternate(&self) -> Option<&str> {
        self.alternate.as_deref()
    }

    pub const fn conditional(&self) -> Conditional {
        self.conditional
    }

    pub const fn on_layout_page(&self) -> bool {
        self.on_layout_page
    }

    pub const fn ignore_processing(&self) -> bool {
        self.ignore_processing
    }

    pub const fn reader(&self) -> &ContentReader {
        &self.reader
    }

    /// Path after alternate resolution.
    pub fn current_path(&self) -> &str {
        resolve_current_path(&self.path, &self.alternate_paths, self.alternate.as_deref())
    }

    pub fn current_path_is_external(&self) -> bool {
        is_external(self.current_path())
    }

    /// External and ignored assets bypass every transform.
    pub fn is_processable(&self) -> bool {
        !self.current_path_is_external() && !self.ignore_processing
    }

    pub const fn is_in_memory(&self) -> bool {
        self.reader.is_in_memory()
    }

    pub fn is_conditional(&self) -> bool {
        self.conditional.is_conditional()
    }

    pub fn identity(&self) -> AssetIdentity {
        AssetIdentity {
            variant: self.variant.clone(),
            path: self.path.clone(),
            conditional: self.conditional,
        }
    }

    pub fn key(&self) -> AssetKey {
        AssetKey {
            variant: self.variant.clone(),
            conditional: self.conditional,
            is_external: self.current_path_is_external(),
        }
    }

    /// Hash of everything that can influence processed output.
    pub fn fingerprint(&self) -> ContentHash {
        let mut fp = Fingerprint::new("asset");
        fp.field(self.kind().as_str())
            .field(&self.path)
            .field(self.current_path())
            .field(self.variant.media().unwrap_or_default())
            .field(self.conditional.equality.as_str())
            .field(self.conditional.browser.as_str())
            .flag(self.on_layout_page)
            .flag(self.ignore_processing)
            .hash(&self.key().stable_hash())
            .hash(&self.reader.fingerprint());
        fp.finish()
    }

    /// Re-home the asset onto another reader. Identity is unchanged.
    pub fn with_reader(mut self, reader: ContentReader) -> Self {
        self.reader = reader;
        self
    }

    /// Same asset, declared as a layout-page inclusion.
    pub fn promoted(mut self) -> Self {
        self.on_layout_page = true;
        self
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.variant == other.variant
            && self.path == other.path
            && self.conditional == other.conditional
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.variant.hash(state);
        self.path.hash(state);
        self.conditional.hash(state);
    }
}

/// The alternate's path when `alternate` names one, else `path`.
fn resolve_current_path<'a>(
    path: &'a str,
    alternate_paths: &'a BTreeMap<String, String>,
    alternate: Option<&str>,
) -> &'a str {
    alternate
        .and_then(|name| alternate_paths.get(name))
        .map_or(path, String::as_str)
}

/// `scheme://host/..` and protocol-relative `//host/..` addresses.
pub fn is_external(path: &str) -> bool {
    path.contains("://") || path.starts_with("//")
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Stylesheet rooted at the default config, built or panicking.
#[cfg(test)]
pub fn test_css(path: &str) -> Asset {
    AssetBuilder::css(path, &crate::config::AssetConfig::default())
        .build()
        .unwrap()
}

/// Script rooted at the default config, built or panicking.
#[cfg(test)]
pub fn test_js(path: &str) -> Asset {
    AssetBuilder::javascript(path, &crate::config::AssetConfig::default())
        .build()
        .unwrap()
}
