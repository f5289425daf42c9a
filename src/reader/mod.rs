//! Content readers: where an asset's text comes from.
//!
//! Declared assets start on a [`FileReader`]; every transform that changes
//! content re-homes the asset onto a [`MemoryReader`]. The renderer
//! publishes in-memory content to the shared cache and links to it
//! indirectly.

mod file;
mod memory;
mod policy;

pub use file::FileReader;
pub use memory::MemoryReader;
pub use policy::{InvalidationPolicy, PolicySnapshot};

use std::sync::Arc;

use crate::error::Result;
use crate::utils::hash::ContentHash;

/// Content source of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentReader {
    File(FileReader),
    Memory(MemoryReader),
}

impl ContentReader {
    /// Produce the content. File readers hit the disk on every call.
    pub fn content(&self) -> Result<Arc<str>> {
        match self {
            Self::File(reader) => reader.content(),
            Self::Memory(reader) => Ok(reader.content()),
        }
    }

    /// Source locations, in order.
    pub fn associated_paths(&self) -> &[String] {
        match self {
            Self::File(reader) => reader.associated_paths(),
            Self::Memory(reader) => reader.associated_paths(),
        }
    }

    pub fn invalidation_policy(&self) -> InvalidationPolicy {
        match self {
            Self::File(reader) => reader.invalidation_policy(),
            Self::Memory(reader) => reader.invalidation_policy(),
        }
    }

    pub fn fingerprint(&self) -> ContentHash {
        match self {
            Self::File(reader) => reader.fingerprint(),
            Self::Memory(reader) => reader.fingerprint(),
        }
    }

    pub const fn is_in_memory(&self) -> bool {
        matches!(self, Self::Memory(_))
    }
}

impl From<FileReader> for ContentReader {
    fn from(reader: FileReader) -> Self {
        Self::File(reader)
    }
}

impl From<MemoryReader> for ContentReader {
    fn from(reader: MemoryReader) -> Self {
        Self::Memory(reader)
    }
}
