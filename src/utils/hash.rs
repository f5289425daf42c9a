//! Content hashing using blake3.
//!
//! Every cache key in the crate is a [`ContentHash`]: reader fingerprints,
//! asset key hashes and minify memo keys.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash::{ContentHash, Fingerprint};
//!
//! let h = ContentHash::of("some content");
//! let mut fp = Fingerprint::new("reader");
//! fp.field("path/to/file.css");
//! let h = fp.finish();
//! ```

use std::fmt;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a single byte slice.
    #[inline]
    pub fn of<T: AsRef<[u8]> + ?Sized>(data: &T) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Incremental hash over a sequence of length-prefixed fields.
///
/// Length prefixes keep `["ab", "c"]` and `["a", "bc"]` apart; the domain
/// string keeps hashes of different record types apart.
pub struct Fingerprint(blake3::Hasher);

impl Fingerprint {
    pub fn new(domain: &str) -> Self {
        let mut fp = Self(blake3::Hasher::new());
        fp.field(domain);
        fp
    }

    pub fn field<T: AsRef<[u8]> + ?Sized>(&mut self, data: &T) -> &mut Self {
        let data = data.as_ref();
        self.0.update(&(data.len() as u64).to_le_bytes());
        self.0.update(data);
        self
    }

    pub fn flag(&mut self, value: bool) -> &mut Self {
        self.0.update(&[u8::from(value)]);
        self
    }

    pub fn hash(&mut self, hash: &ContentHash) -> &mut Self {
        self.0.update(hash.as_bytes());
        self
    }

    pub fn finish(&self) -> ContentHash {
        ContentHash(*self.0.finalize().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let hash = ContentHash::of("body { color: red; }");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(ContentHash::from_hex(&hex), Some(hash));
        assert_eq!(ContentHash::from_hex("abc"), None);
        assert_eq!(ContentHash::from_hex("zz"), None);
    }

    #[test]
    fn test_display_is_short() {
        let hash = ContentHash::of("x");
        assert_eq!(hash.to_string().len(), 16);
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        let a = Fingerprint::new("t").field("ab").field("c").finish();
        let b = Fingerprint::new("t").field("a").field("bc").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_domain_separates() {
        let a = Fingerprint::new("css").field("x").finish();
        let b = Fingerprint::new("js").field("x").finish();
        assert_ne!(a, b);
    }
}
