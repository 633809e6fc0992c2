//! Scoped handler registries

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Insertion-ordered set of handlers with scoped registration.
///
/// Registering returns a guard that removes exactly that handler when
/// dropped. Iteration uses a snapshot, so handlers registered while a
/// transition is running are invisible to it.
pub struct HandlerRegistry<H: ?Sized> {
    inner: Arc<RegistryInner<H>>,
}

struct RegistryInner<H: ?Sized> {
    entries: RwLock<Vec<(u64, Arc<H>)>>,
    next_id: AtomicU64,
}

impl<H: ?Sized> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    #[must_use = "the handler is deregistered when the guard drops"]
    pub fn register(&self, handler: Arc<H>) -> HandlerGuard<H> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.entries.write().push((id, handler));
        HandlerGuard {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn snapshot(&self) -> Vec<Arc<H>> {
        self.inner
            .entries
            .read()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }
}

impl<H: ?Sized> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> Clone for HandlerRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Removes its handler from the registry on drop.
pub struct HandlerGuard<H: ?Sized> {
    inner: Weak<RegistryInner<H>>,
    id: u64,
}

impl<H: ?Sized> Drop for HandlerGuard<H> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.entries.write().retain(|(id, _)| *id != self.id);
        }
    }
}
