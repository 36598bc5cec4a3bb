use crate::runtime::ReactiveRuntime;
use std::sync::{Arc, RwLock};

/// A memoized computed value that automatically tracks dependencies.
///
/// Memos only recompute when their dependencies change.
pub struct Memo<T> {
    cached_value: Arc<RwLock<Option<T>>>,
    compute: Arc<dyn Fn() -> T + Send + Sync>,
    id: usize,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cached_value: Arc::clone(&self.cached_value),
            compute: Arc::clone(&self.compute),
            id: self.id,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Memo<T> {
    /// Create a new memo with the given computation function.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::{Memo, Signal};
    ///
    /// let count = Signal::new(5);
    /// let doubled = Memo::new({
    ///     let count = count.clone();
    ///     move || count.get() * 2
    /// });
    /// assert_eq!(doubled.get(), 10);
    ///
    /// count.set(10);
    /// assert_eq!(doubled.get(), 20);
    /// ```
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();

        // Register this as a memo with the runtime
        runtime.register_memo(id);

        Self {
            cached_value: Arc::new(RwLock::new(None)),
            compute: Arc::new(compute),
            id,
        }
    }

    /// Create a memo with a custom equality comparator.
    ///
    /// The comparator gates change propagation: when an invalidation
    /// recomputes the memo and the comparator reports the result equal to
    /// the cached value, downstream observers are not notified. Gated memos
    /// recompute eagerly on invalidation so propagation can stop early.
    pub fn with_equals<F, E>(compute: F, equals: E) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();

        runtime.register_memo(id);

        let cached_value: Arc<RwLock<Option<T>>> = Arc::new(RwLock::new(None));
        let compute: Arc<dyn Fn() -> T + Send + Sync> = Arc::new(compute);

        let gate = {
            let cached_value = Arc::clone(&cached_value);
            let compute = Arc::clone(&compute);
            move || {
                let runtime = ReactiveRuntime::current();
                runtime.clear_observer_deps(id);
                let value = runtime.with_observer(id, || compute());
                let changed = {
                    let mut cache = cached_value.write().unwrap();
                    let changed = match cache.as_ref() {
                        Some(old) => !equals(old, &value),
                        None => true,
                    };
                    if changed {
                        *cache = Some(value);
                    }
                    changed
                };
                runtime.mark_memo_clean(id);
                changed
            }
        };
        runtime.register_memo_gate(id, gate);

        Self {
            cached_value,
            compute,
            id,
        }
    }

    /// Get the current value, recomputing if necessary.
    pub fn get(&self) -> T {
        let runtime = ReactiveRuntime::current();

        // Track this read in the reactive context
        runtime.track_read(self.id);

        // Check if we need to recompute
        if runtime.is_memo_dirty(self.id) {
            // Recompute within observer context to track dependencies
            runtime.clear_observer_deps(self.id);
            let value = runtime.with_observer(self.id, || (self.compute)());
            *self.cached_value.write().unwrap() = Some(value.clone());
            runtime.mark_memo_clean(self.id);
            value
        } else {
            // Return cached value
            self.cached_value.read().unwrap().as_ref().unwrap().clone()
        }
    }

    /// Read the memoized value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let runtime = ReactiveRuntime::current();
        runtime.track_read(self.id);

        if runtime.is_memo_dirty(self.id) {
            runtime.clear_observer_deps(self.id);
            let value = runtime.with_observer(self.id, || (self.compute)());
            *self.cached_value.write().unwrap() = Some(value.clone());
            runtime.mark_memo_clean(self.id);
        }
        let cached = self.cached_value.read().unwrap();
        f(cached.as_ref().unwrap())
    }

    /// Get the memo's unique ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
