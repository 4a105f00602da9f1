//! Render observers
//!
//! An [`Observable`] holds callbacks registered against the graph's before- and
//! after-render notifications. Registration returns an [`ObserverHandle`] that
//! removes the callback again.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

impl ObserverHandle {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

struct Entry<T> {
    handle: ObserverHandle,
    once: bool,
    callback: Box<dyn FnMut(&mut T)>,
}

/// A list of callbacks notified with `&mut T`
pub struct Observable<T> {
    entries: Vec<Entry<T>>,
    // removals requested while this observable was detached for notification
    pending_removals: Vec<ObserverHandle>,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            pending_removals: Vec::new(),
        }
    }
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback run on every notification
    pub fn add<F>(&mut self, callback: F) -> ObserverHandle
    where
        F: FnMut(&mut T) + 'static,
    {
        self.push(callback, false)
    }

    /// Registers a callback that unregisters itself after its first run
    pub fn add_once<F>(&mut self, callback: F) -> ObserverHandle
    where
        F: FnMut(&mut T) + 'static,
    {
        self.push(callback, true)
    }

    fn push<F>(&mut self, callback: F, once: bool) -> ObserverHandle
    where
        F: FnMut(&mut T) + 'static,
    {
        let handle = ObserverHandle::next();
        self.entries.push(Entry {
            handle,
            once,
            callback: Box::new(callback),
        });
        handle
    }

    /// Removes an observer; returns false if it was not registered here
    pub fn remove(&mut self, handle: ObserverHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        if self.entries.len() == before {
            self.pending_removals.push(handle);
            false
        } else {
            true
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every observer in registration order
    pub fn notify(&mut self, target: &mut T) {
        for entry in self.entries.iter_mut() {
            (entry.callback)(target);
        }
        self.entries.retain(|entry| !entry.once);
        self.pending_removals.clear();
    }

    /// Folds in observers added (and applies removals requested) on a
    /// placeholder while `self` was detached for notification
    pub(crate) fn absorb(&mut self, detached: Observable<T>) {
        self.entries.extend(detached.entries);
        for handle in detached.pending_removals {
            self.entries.retain(|entry| entry.handle != handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_observer_runs_once() {
        let mut observable = Observable::<u32>::new();
        observable.add(|n| *n += 1);
        observable.add_once(|n| *n += 10);

        let mut value = 0;
        observable.notify(&mut value);
        observable.notify(&mut value);

        assert_eq!(value, 12);
        assert_eq!(observable.len(), 1);
    }

    #[test]
    fn test_remove_by_handle() {
        let mut observable = Observable::<u32>::new();
        let handle = observable.add(|n| *n += 1);

        assert!(observable.remove(handle));
        assert!(!observable.remove(handle));

        let mut value = 0;
        observable.notify(&mut value);
        assert_eq!(value, 0);
    }

    #[test]
    fn test_absorb_applies_detached_changes() {
        let mut live = Observable::<u32>::new();
        let doomed = live.add(|n| *n += 100);

        let mut detached = Observable::<u32>::new();
        detached.add(|n| *n += 1);
        detached.remove(doomed);
        live.absorb(detached);

        let mut value = 0;
        live.notify(&mut value);
        assert_eq!(value, 1);
    }
}
