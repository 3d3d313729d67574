//! Hierarchical progress reporting and cooperative cancellation
//!
//! A [`ProgressStatus`] holds the overall percentage in `[0, 100]` and the
//! cancellation flag. Work is split into nested [`ProgressScope`]s, each
//! owning a slice of its parent's range. Dropping a scope moves the status
//! to the end of its slice, so early returns still leave consistent values.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Receives progress notifications; may be called from worker threads
pub trait ProgressObserver: Send + Sync {
    fn changed_value(&self, _value: f64) {}
    fn completed(&self) {}
    fn canceled(&self) {}
}

struct StatusInner {
    value: AtomicU64,
    canceled: AtomicBool,
    observers: RwLock<Vec<(u64, Arc<dyn ProgressObserver>)>>,
    next_observer: AtomicU64,
}

/// Shared progress state of one long operation
#[derive(Clone)]
pub struct ProgressStatus {
    inner: Arc<StatusInner>,
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStatus")
            .field("value", &self.value())
            .field("canceled", &self.was_canceled())
            .finish()
    }
}

impl ProgressStatus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StatusInner {
                value: AtomicU64::new(0.0f64.to_bits()),
                canceled: AtomicBool::new(false),
                observers: RwLock::new(Vec::new()),
                next_observer: AtomicU64::new(0),
            }),
        }
    }

    /// Current percentage
    pub fn value(&self) -> f64 {
        f64::from_bits(self.inner.value.load(Ordering::Acquire))
    }

    pub fn was_canceled(&self) -> bool {
        self.inner.canceled.load(Ordering::Acquire)
    }

    /// Request cancellation; producers notice it at their next scope boundary
    pub fn cancel(&self) {
        if !self.inner.canceled.swap(true, Ordering::AcqRel) {
            tracing::debug!("Progress canceled at {:.1}%", self.value());
            for observer in self.observers() {
                observer.canceled();
            }
        }
    }

    /// Register an observer for as long as the returned guard lives
    pub fn register(&self, observer: Arc<dyn ProgressObserver>) -> ObserverGuard {
        let id = self.inner.next_observer.fetch_add(1, Ordering::Relaxed);
        self.inner.observers.write().push((id, observer));
        ObserverGuard {
            status: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.read().len()
    }

    fn observers(&self) -> Vec<Arc<dyn ProgressObserver>> {
        self.inner
            .observers
            .read()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }

    /// Move forward to `value`; the percentage never decreases
    fn advance_to(&self, value: f64) {
        let value = value.clamp(0.0, 100.0);
        let previous = self
            .inner
            .value
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                (value > f64::from_bits(bits)).then_some(value.to_bits())
            });
        if previous.is_ok() {
            for observer in self.observers() {
                observer.changed_value(value);
            }
        }
    }

    fn complete(&self) {
        for observer in self.observers() {
            observer.completed();
        }
    }
}

/// Unregisters its observer when dropped
#[must_use = "the observer is unregistered when the guard is dropped"]
pub struct ObserverGuard {
    status: Weak<StatusInner>,
    id: u64,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.status.upgrade() {
            inner.observers.write().retain(|(id, _)| *id != self.id);
        }
    }
}

/// A slice `[start, end]` of the overall percentage
pub struct ProgressScope<'s> {
    status: &'s ProgressStatus,
    start: f64,
    end: f64,
    cursor: Cell<f64>,
    root: bool,
}

impl<'s> ProgressScope<'s> {
    /// Weight that takes whatever is left of the parent's range
    pub const REMAINING: f64 = -1.0;

    /// Top-level scope covering the full range
    pub fn root(status: &'s ProgressStatus) -> Self {
        Self {
            status,
            start: 0.0,
            end: 100.0,
            cursor: Cell::new(0.0),
            root: true,
        }
    }

    /// Next child covering `weight` percent of this scope's range
    pub fn child(&self, weight: f64) -> ProgressScope<'s> {
        let start = self.cursor.get();
        let end = if weight < 0.0 {
            self.end
        } else {
            (start + (self.end - self.start) * weight / 100.0).min(self.end)
        };
        self.cursor.set(end);
        ProgressScope {
            status: self.status,
            start,
            end,
            cursor: Cell::new(start),
            root: false,
        }
    }

    /// Report progress inside this scope, `fraction` in `[0, 1]`
    pub fn set_fraction(&self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.status
            .advance_to(self.start + (self.end - self.start) * fraction);
    }

    pub fn was_canceled(&self) -> bool {
        self.status.was_canceled()
    }

    pub fn status(&self) -> &ProgressStatus {
        self.status
    }

    pub fn range(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        if self.status.was_canceled() {
            return;
        }
        self.status.advance_to(self.end);
        if self.root {
            self.status.complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        values: Mutex<Vec<f64>>,
        completed: AtomicU64,
        canceled: AtomicU64,
    }

    impl ProgressObserver for Recorder {
        fn changed_value(&self, value: f64) {
            self.values.lock().push(value);
        }
        fn completed(&self) {
            self.completed.fetch_add(1, Ordering::Relaxed);
        }
        fn canceled(&self) {
            self.canceled.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_nested_weights() {
        let status = ProgressStatus::new();
        let recorder = Arc::new(Recorder::default());
        let _guard = status.register(recorder.clone());

        {
            let root = ProgressScope::root(&status);
            {
                let read = root.child(40.0);
                {
                    let open = read.child(25.0);
                    assert_eq!(open.range(), (0.0, 10.0));
                }
                assert_relative_eq!(status.value(), 10.0);
                {
                    let transfer = read.child(ProgressScope::REMAINING);
                    assert_eq!(transfer.range(), (10.0, 40.0));
                    transfer.set_fraction(0.5);
                    assert_relative_eq!(status.value(), 25.0);
                }
            }
            assert_relative_eq!(status.value(), 40.0);
            let mesh = root.child(ProgressScope::REMAINING);
            assert_eq!(mesh.range(), (40.0, 100.0));
        }

        assert_relative_eq!(status.value(), 100.0);
        assert_eq!(recorder.completed.load(Ordering::Relaxed), 1);
        assert_eq!(*recorder.values.lock(), vec![10.0, 25.0, 40.0, 100.0]);
    }

    #[test]
    fn test_cancel_freezes_value() {
        let status = ProgressStatus::new();
        let recorder = Arc::new(Recorder::default());
        let _guard = status.register(recorder.clone());

        {
            let root = ProgressScope::root(&status);
            let read = root.child(40.0);
            read.set_fraction(0.5);
            status.cancel();
            status.cancel();
            assert!(read.was_canceled());
        }

        assert_relative_eq!(status.value(), 20.0);
        assert_eq!(recorder.canceled.load(Ordering::Relaxed), 1);
        assert_eq!(recorder.completed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_guard_unregisters_observer() {
        let status = ProgressStatus::new();
        let recorder = Arc::new(Recorder::default());
        {
            let _guard = status.register(recorder.clone());
            assert_eq!(status.observer_count(), 1);
        }
        assert_eq!(status.observer_count(), 0);
        drop(ProgressScope::root(&status));
        assert!(recorder.values.lock().is_empty());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let status = ProgressStatus::new();
        let recorder = Arc::new(Recorder::default());
        let _guard = status.register(recorder.clone());

        std::thread::scope(|scope| {
            let remote = status.clone();
            scope.spawn(move || remote.cancel());
        });

        assert!(status.was_canceled());
        assert_eq!(recorder.canceled.load(Ordering::Relaxed), 1);
    }
}
