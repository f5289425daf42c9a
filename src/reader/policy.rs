//! Cache invalidation policy attached to reader content.
//!
//! A policy names the files whose change makes cached content stale and an
//! optional time-to-live. Inserting into a cache takes a [`PolicySnapshot`]
//! that records the watched files' modification times at that moment.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Which sources invalidate a cache entry, and after how long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationPolicy {
    watched: Vec<PathBuf>,
    ttl: Option<Duration>,
}

impl InvalidationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch each path, skipping duplicates.
    pub fn watch<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            let path = path.into();
            if !self.watched.contains(&path) {
                self.watched.push(path);
            }
        }
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Keep an existing ttl, else use `ttl`.
    pub fn or_ttl(self, ttl: Duration) -> Self {
        match self.ttl {
            Some(_) => self,
            None => self.with_ttl(ttl),
        }
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Record the current state of every watched path.
    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            inserted: Instant::now(),
            ttl: self.ttl,
            mtimes: self
                .watched
                .iter()
                .map(|path| (path.clone(), get_mtime(path)))
                .collect(),
        }
    }
}

/// Policy state captured when an entry was inserted.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    inserted: Instant,
    ttl: Option<Duration>,
    mtimes: Vec<(PathBuf, Option<SystemTime>)>,
}

impl PolicySnapshot {
    /// Expired, or some watched path changed, appeared or vanished.
    pub fn is_stale(&self) -> bool {
        if self.ttl.is_some_and(|ttl| self.inserted.elapsed() >= ttl) {
            return true;
        }
        self.mtimes
            .iter()
            .any(|(path, mtime)| get_mtime(path) != *mtime)
    }
}

fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_watch_dedups() {
        let policy = InvalidationPolicy::new().watch(["a.css", "b.css", "a.css"]);
        assert_eq!(policy.watched().len(), 2);
    }

    #[test]
    fn test_fresh_until_file_changes() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("site.css");
        fs::write(&file, "a{}").unwrap();

        let snapshot = InvalidationPolicy::new().watch([&file]).snapshot();
        assert!(!snapshot.is_stale());

        let later = SystemTime::now() + Duration::from_secs(60);
        fs::File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(later)
            .unwrap();
        assert!(snapshot.is_stale());
    }

    #[test]
    fn test_stale_when_file_removed_or_created() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("site.css");
        fs::write(&file, "a{}").unwrap();
        let snapshot = InvalidationPolicy::new().watch([&file]).snapshot();
        fs::remove_file(&file).unwrap();
        assert!(snapshot.is_stale());

        let missing = dir.path().join("later.css");
        let snapshot = InvalidationPolicy::new().watch([&missing]).snapshot();
        assert!(!snapshot.is_stale());
        fs::write(&missing, "b{}").unwrap();
        assert!(snapshot.is_stale());
    }

    #[test]
    fn test_ttl_expiry() {
        let snapshot = InvalidationPolicy::new().with_ttl(Duration::ZERO).snapshot();
        assert!(snapshot.is_stale());

        let snapshot = InvalidationPolicy::new()
            .with_ttl(Duration::from_secs(3600))
            .snapshot();
        assert!(!snapshot.is_stale());
    }

    #[test]
    fn test_or_ttl_keeps_existing() {
        let policy = InvalidationPolicy::new()
            .with_ttl(Duration::from_secs(5))
            .or_ttl(Duration::from_secs(10));
        assert_eq!(policy.ttl(), Some(Duration::from_secs(5)));
        let policy = InvalidationPolicy::new().or_ttl(Duration::from_secs(10));
        assert_eq!(policy.ttl(), Some(Duration::from_secs(10)));
    }
}
