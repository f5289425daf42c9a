//! In-memory reader produced by transforms.

use std::path::PathBuf;
use std::sync::Arc;

use super::InvalidationPolicy;
use crate::asset::is_external;
use crate::utils::hash::{ContentHash, Fingerprint};

/// Holds transformed content and the source paths it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReader {
    content: Arc<str>,
    paths: Vec<String>,
}

impl MemoryReader {
    pub fn new(content: impl Into<Arc<str>>, paths: Vec<String>) -> Self {
        Self {
            content: content.into(),
            paths,
        }
    }

    pub fn content(&self) -> Arc<str> {
        Arc::clone(&self.content)
    }

    pub fn associated_paths(&self) -> &[String] {
        &self.paths
    }

    /// Watches every associated path that is a local file.
    pub fn invalidation_policy(&self) -> InvalidationPolicy {
        InvalidationPolicy::new().watch(
            self.paths
                .iter()
                .filter(|path| !is_external(path))
                .map(PathBuf::from),
        )
    }

    /// Paths plus the literal content.
    pub fn fingerprint(&self) -> ContentHash {
        let mut fp = Fingerprint::new("memory-reader");
        for path in &self.paths {
            fp.field(path);
        }
        fp.field(&*self.content);
        fp.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_tracks_content_and_paths() {
        let a = MemoryReader::new("a{}", vec!["/srv/a.css".into()]);
        let same = MemoryReader::new("a{}", vec!["/srv/a.css".into()]);
        let content = MemoryReader::new("b{}", vec!["/srv/a.css".into()]);
        let paths = MemoryReader::new("a{}", vec!["/srv/b.css".into()]);
        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), content.fingerprint());
        assert_ne!(a.fingerprint(), paths.fingerprint());
    }

    #[test]
    fn test_policy_skips_external_paths() {
        let reader = MemoryReader::new(
            "",
            vec!["/srv/a.css".into(), "http://cdn.example.com/b.css".into()],
        );
        assert_eq!(reader.invalidation_policy().watched(), [PathBuf::from("/srv/a.css")]);
    }
}
