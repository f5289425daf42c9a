//! File-backed reader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::InvalidationPolicy;
use crate::asset::is_external;
use crate::error::{AssetError, Result};
use crate::utils::hash::{ContentHash, Fingerprint};

/// Reads an asset's current path from disk on every request.
///
/// External addresses are never read; their only associated path is the
/// URL itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReader {
    /// `None` for external assets.
    file: Option<PathBuf>,
    paths: Vec<String>,
    key: ContentHash,
}

impl FileReader {
    /// Map `current_path` under `root`. `key` is the owning asset's key hash.
    pub fn new(current_path: &str, key: ContentHash, root: &Path) -> Self {
        if is_external(current_path) {
            return Self {
                file: None,
                paths: vec![current_path.to_string()],
                key,
            };
        }

        let file = root.join(app_relative(current_path));
        Self {
            paths: vec![file.to_string_lossy().into_owned()],
            file: Some(file),
            key,
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn content(&self) -> Result<Arc<str>> {
        let Some(file) = &self.file else {
            return Err(AssetError::invalid(format!(
                "`{}` is external and has no local content",
                self.paths.join(", ")
            )));
        };
        let content = fs::read_to_string(file).map_err(|source| AssetError::Io {
            path: file.clone(),
            source,
        })?;
        Ok(content.into())
    }

    pub fn associated_paths(&self) -> &[String] {
        &self.paths
    }

    pub fn invalidation_policy(&self) -> InvalidationPolicy {
        InvalidationPolicy::new().watch(self.file.iter())
    }

    /// Paths plus the owning asset's key hash.
    pub fn fingerprint(&self) -> ContentHash {
        let mut fp = Fingerprint::new("file-reader");
        for path in &self.paths {
            fp.field(path);
        }
        fp.hash(&self.key);
        fp.finish()
    }
}

/// Strip the app-root marker `~/` and any leading `/`.
fn app_relative(path: &str) -> &str {
    path.strip_prefix("~/")
        .unwrap_or(path)
        .trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key() -> ContentHash {
        ContentHash::of("key")
    }

    #[test]
    fn test_maps_under_root() {
        let root = Path::new("/srv/site");
        for path in ["~/css/site.css", "/css/site.css", "css/site.css"] {
            let reader = FileReader::new(path, key(), root);
            assert_eq!(reader.file(), Some(Path::new("/srv/site/css/site.css")));
        }
    }

    #[test]
    fn test_reads_lazily() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        let reader = FileReader::new("~/css/site.css", key(), dir.path());

        assert!(matches!(reader.content(), Err(AssetError::Io { .. })));

        fs::write(dir.path().join("css/site.css"), "body { color: red; }").unwrap();
        assert_eq!(&*reader.content().unwrap(), "body { color: red; }");

        fs::write(dir.path().join("css/site.css"), "p {}").unwrap();
        assert_eq!(&*reader.content().unwrap(), "p {}");
    }

    #[test]
    fn test_external_has_no_content() {
        let reader = FileReader::new("http://cdn.example.com/a.js", key(), Path::new("/srv"));
        assert_eq!(reader.associated_paths(), ["http://cdn.example.com/a.js"]);
        assert!(reader.file().is_none());
        assert!(reader.invalidation_policy().watched().is_empty());
        assert!(matches!(
            reader.content(),
            Err(AssetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_fingerprint_uses_paths_and_key() {
        let root = Path::new("/srv");
        let a = FileReader::new("a.css", key(), root);
        assert_eq!(a.fingerprint(), FileReader::new("a.css", key(), root).fingerprint());
        assert_ne!(a.fingerprint(), FileReader::new("b.css", key(), root).fingerprint());
        assert_ne!(
            a.fingerprint(),
            FileReader::new("a.css", ContentHash::of("other"), root).fingerprint()
        );
    }
}
