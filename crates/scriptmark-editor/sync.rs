//! Shared store handle
//!
//! Wraps an [`AnnotationStore`] for hosts that touch one store from several
//! threads, such as a UI thread plus a realtime subscription worker.
//! `parking_lot` locks do not poison, so acquiring them cannot fail.

use crate::core::Result;
use crate::store::AnnotationStore;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Cloneable handle to a store behind a read-write lock
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<AnnotationStore>>,
}

impl SharedStore {
    /// Wrap a store
    #[must_use]
    pub fn new(store: AnnotationStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared access
    pub fn read(&self) -> RwLockReadGuard<'_, AnnotationStore> {
        self.inner.read()
    }

    /// Exclusive access
    pub fn write(&self) -> RwLockWriteGuard<'_, AnnotationStore> {
        self.inner.write()
    }

    /// Try to get shared access without blocking
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, AnnotationStore>> {
        self.inner.try_read()
    }

    /// Try to get exclusive access without blocking
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, AnnotationStore>> {
        self.inner.try_write()
    }

    /// Run `f` with shared access
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AnnotationStore) -> R,
    {
        f(&self.inner.read())
    }

    /// Run a mutation with exclusive access
    ///
    /// # Errors
    /// Returns whatever `f` returns.
    pub fn with_write<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut AnnotationStore) -> Result<R>,
    {
        f(&mut self.inner.write())
    }

    /// Number of handles sharing the store
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl From<AnnotationStore> for SharedStore {
    fn from(store: AnnotationStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::sample_store;
    use scriptmark_core::annotation::Highlight;
    use std::thread;

    #[test]
    fn writes_from_many_threads() {
        let shared = SharedStore::new(sample_store());
        let workers: Vec<_> = (0..4)
            .map(|i| {
                let handle = shared.clone();
                thread::spawn(move || {
                    handle.with_write(|store| store.add_highlight(Highlight::new(format!("h{i}"), "s2", i, i + 1)))
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }

        assert_eq!(shared.with_read(AnnotationStore::highlight_count), 4);
        assert_eq!(shared.handle_count(), 1);
    }

    #[test]
    fn errors_pass_through() {
        let shared: SharedStore = sample_store().into();
        let result = shared.with_write(|store| store.remove_highlight("missing"));
        assert!(result.is_err());
        assert!(shared.try_read().is_some());
        let _guard = shared.write();
        assert!(shared.try_read().is_none());
    }
}
