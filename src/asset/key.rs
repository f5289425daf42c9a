//! Asset identity (deduplication) and key (combination grouping).
//!
//! Identity decides whether two declarations are "the same asset" inside a
//! group. The key is coarser: every asset sharing a key may be merged into
//! one output unit by the combine transform.

use super::{AssetKind, Conditional, Variant};
use crate::utils::hash::{ContentHash, Fingerprint};

/// Value identity of an asset: kind (with media), path and conditional gate.
///
/// Layout flag, alternate paths and reader never take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetIdentity {
    pub variant: Variant,
    pub path: String,
    pub conditional: Conditional,
}

impl AssetIdentity {
    pub const fn kind(&self) -> AssetKind {
        self.variant.kind()
    }
}

/// Combination key: assets with equal keys are merged by `Combine`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub variant: Variant,
    pub conditional: Conditional,
    pub is_external: bool,
}

impl AssetKey {
    /// Hash that is stable across processes.
    ///
    /// The kind is always hashed, so a stylesheet key and a script key never
    /// collide even when every other field matches.
    pub fn stable_hash(&self) -> ContentHash {
        let mut fp = Fingerprint::new("asset-key");
        fp.field(self.variant.kind().as_str())
            .field(self.variant.media().unwrap_or_default())
            .field(self.conditional.equality.as_str())
            .field(self.conditional.browser.as_str())
            .flag(self.is_external);
        fp.finish()
    }
}
