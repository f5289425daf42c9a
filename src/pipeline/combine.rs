//! Merge assets that share a combination key.

use rustc_hash::FxHashMap;

use super::{Transform, split_processable};
use crate::asset::{Asset, AssetKey};
use crate::error::Result;
use crate::reader::MemoryReader;

/// Collapses every partition of processable assets with equal keys into one
/// in-memory asset. Single-member partitions pass through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Combine;

impl Transform for Combine {
    fn name(&self) -> &'static str {
        "combine"
    }

    fn apply(&self, assets: Vec<Asset>) -> Result<Vec<Asset>> {
        let (mut out, processable) = split_processable(assets);

        // partitions in order of first appearance
        let mut index: FxHashMap<AssetKey, usize> = FxHashMap::default();
        let mut partitions: Vec<Vec<Asset>> = Vec::new();
        for asset in processable {
            let slot = *index.entry(asset.key()).or_insert_with(|| {
                partitions.push(Vec::new());
                partitions.len() - 1
            });
            partitions[slot].push(asset);
        }

        for members in partitions {
            if members.len() == 1 {
                out.extend(members);
            } else {
                out.push(combine(members)?);
            }
        }

        Ok(out)
    }
}

/// Layout members first, then the rest; each keeps its relative order.
/// The result takes the identity of the first member in that order.
fn combine(mut members: Vec<Asset>) -> Result<Asset> {
    members.sort_by_key(|asset| !asset.on_layout_page());

    let mut content = String::new();
    let mut paths = Vec::new();
    for member in &members {
        content.push_str(&member.reader().content()?);
        content.push('\n');
        paths.extend_from_slice(member.reader().associated_paths());
    }

    // partitions handed in here hold at least two members
    let first = members.swap_remove(0);
    Ok(first.with_reader(MemoryReader::new(content, paths).into()))
}
