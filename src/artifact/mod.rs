//! In-memory holder of the latest successful bundle.
//!
//! Readers (`get`) are a single atomic load and always observe either the
//! previous complete artifact or the new complete one. Writers are
//! serialized so revisions are strictly increasing in store order.
//!
//! Only successful builds are ever stored; a failed build leaves the
//! current artifact untouched.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use crate::build::Bundle;

/// A stored bundle with its position in the store history.
#[derive(Debug, PartialEq, Eq)]
pub struct Artifact {
    /// 1 for the first stored bundle, +1 per `set`.
    pub revision: u64,
    pub bundle: Bundle,
}

#[derive(Debug, Default)]
pub struct ArtifactStore {
    current: ArcSwapOption<Artifact>,
    /// Last handed-out revision; the lock orders concurrent writers.
    revision: Mutex<u64>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current artifact and return it.
    pub fn set(&self, bundle: Bundle) -> Arc<Artifact> {
        let mut revision = self.revision.lock();
        *revision += 1;
        let artifact = Arc::new(Artifact {
            revision: *revision,
            bundle,
        });
        self.current.store(Some(Arc::clone(&artifact)));
        artifact
    }

    /// Current artifact, if any build has succeeded yet.
    #[inline]
    pub fn get(&self) -> Option<Arc<Artifact>> {
        self.current.load_full()
    }

    pub fn revision(&self) -> u64 {
        self.get().map_or(0, |a| a.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_store() {
        let store = ArtifactStore::new();
        assert!(store.get().is_none());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_latest_set_wins() {
        let store = ArtifactStore::new();
        store.set(Bundle::new("one"));
        let second = store.set(Bundle::new("two"));

        let current = store.get().unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert_eq!(current.revision, 2);
        assert_eq!(current.bundle.text(), "two");
    }

    #[test]
    fn test_reader_keeps_its_snapshot() {
        let store = ArtifactStore::new();
        store.set(Bundle::new("old"));
        let held = store.get().unwrap();

        store.set(Bundle::new("new"));
        assert_eq!(held.bundle.text(), "old");
        assert_eq!(store.get().unwrap().bundle.text(), "new");
    }

    #[test]
    fn test_concurrent_writers_get_distinct_revisions() {
        let store = Arc::new(ArtifactStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.set(Bundle::new(format!("b{i}"))).revision)
            })
            .collect();

        let mut revisions: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        revisions.sort_unstable();
        assert_eq!(revisions, (1..=8).collect::<Vec<_>>());
        assert_eq!(store.revision(), 8);
    }
}
