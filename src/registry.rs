//! Per-render registry of declared assets.
//!
//! Each kind keeps named groups of distinct assets in insertion order, plus
//! a tombstone set per group name. Tombstones only grow: a removal made
//! before the matching add still suppresses it.
//!
//! # Rules for `add`
//!
//! | State of the group                        | Effect                 |
//! |-------------------------------------------|------------------------|
//! | identity tombstoned                       | ignored                |
//! | identity absent                           | appended               |
//! | present, stored off-layout, new on-layout | replaced in place      |
//! | present otherwise                         | ignored                |

use rustc_hash::{FxHashMap, FxHashSet};

use crate::asset::{Asset, AssetIdentity, AssetKind};
use crate::debug;

/// Group used when none (or a blank name) is given.
pub const DEFAULT_GROUP: &str = "Default";

/// Resolve an optional group name to the one actually used.
pub fn group_name(group: Option<&str>) -> &str {
    group
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_GROUP)
}

#[derive(Debug, Default)]
struct KindGroups {
    groups: FxHashMap<String, Vec<Asset>>,
    removed: FxHashMap<String, FxHashSet<AssetIdentity>>,
}

impl KindGroups {
    fn is_removed(&self, group: &str, identity: &AssetIdentity) -> bool {
        self.removed
            .get(group)
            .is_some_and(|removed| removed.contains(identity))
    }
}

/// Groups of declared assets for one render scope.
///
/// Not shared between threads; one registry serves one page.
#[derive(Debug, Default)]
pub struct Registry {
    css: KindGroups,
    javascript: KindGroups,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn kind(&self, kind: AssetKind) -> &KindGroups {
        match kind {
            AssetKind::Css => &self.css,
            AssetKind::Javascript => &self.javascript,
        }
    }

    fn kind_mut(&mut self, kind: AssetKind) -> &mut KindGroups {
        match kind {
            AssetKind::Css => &mut self.css,
            AssetKind::Javascript => &mut self.javascript,
        }
    }

    /// Declare `asset` in `group`.
    pub fn add(&mut self, asset: Asset, group: Option<&str>) {
        let group = group_name(group);
        let identity = asset.identity();
        let groups = self.kind_mut(asset.kind());

        if groups.is_removed(group, &identity) {
            debug!("registry"; "ignoring removed {} `{}` in {}", asset.kind(), asset.path(), group);
            return;
        }

        let members = groups.groups.entry(group.to_string()).or_default();
        match members.iter().position(|existing| existing.identity() == identity) {
            None => members.push(asset),
            Some(i) if asset.on_layout_page() && !members[i].on_layout_page() => {
                members[i] = asset;
            }
            Some(_) => {}
        }
    }

    /// Remove `asset` from `group` and tombstone its identity there.
    pub fn remove(&mut self, asset: &Asset, group: Option<&str>) {
        let group = group_name(group);
        let identity = asset.identity();
        let groups = self.kind_mut(asset.kind());

        if let Some(members) = groups.groups.get_mut(group) {
            members.retain(|existing| existing.identity() != identity);
        }
        groups
            .removed
            .entry(group.to_string())
            .or_default()
            .insert(identity);
    }

    /// Current members of `group` for `kind`, in insertion order.
    pub fn render(&self, kind: AssetKind, group: Option<&str>) -> &[Asset] {
        self.kind(kind)
            .groups
            .get(group_name(group))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of non-empty groups for `kind`, sorted.
    pub fn group_names(&self, kind: AssetKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .kind(kind)
            .groups
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
