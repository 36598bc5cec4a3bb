use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Reactive context for tracking dependencies (thread-local).
struct ReactiveContext {
    current_observer: Option<usize>,
    // Nesting depth of untracked scopes; reads register nothing while > 0
    untracked_depth: usize,
    // Map from source ID (signal or memo) to set of observer IDs that depend on it
    dependencies: HashMap<usize, HashSet<usize>>,
    // Map from observer ID to set of source IDs it depends on
    observer_deps: HashMap<usize, HashSet<usize>>,
    // Map from observer ID to the effect function
    observers: HashMap<usize, Arc<dyn Fn() + Send + Sync>>,
    // Map from memo ID to dirty state
    memo_dirty: HashMap<usize, bool>,
    // Change gates for memos with a custom comparator: recompute on
    // invalidation and report whether the cached value actually changed
    memo_gates: HashMap<usize, Arc<dyn Fn() -> bool + Send + Sync>>,
}

impl ReactiveContext {
    fn new() -> Self {
        Self {
            current_observer: None,
            untracked_depth: 0,
            dependencies: HashMap::new(),
            observer_deps: HashMap::new(),
            observers: HashMap::new(),
            memo_dirty: HashMap::new(),
            memo_gates: HashMap::new(),
        }
    }

    fn clear(&mut self) {
        self.current_observer = None;
        self.untracked_depth = 0;
        self.dependencies.clear();
        self.observer_deps.clear();
        self.observers.clear();
        self.memo_dirty.clear();
        self.memo_gates.clear();
    }

    fn unlink_observer(&mut self, observer_id: usize) {
        if let Some(old_deps) = self.observer_deps.remove(&observer_id) {
            for source_id in old_deps {
                if let Some(deps) = self.dependencies.get_mut(&source_id) {
                    deps.remove(&observer_id);
                }
            }
        }
    }
}

/// Inner runtime state that can be shared.
pub struct RuntimeInner {
    context: Mutex<ReactiveContext>,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            context: Mutex::new(ReactiveContext::new()),
        }
    }

    pub fn remove_observer(&mut self, observer_id: usize) {
        let mut ctx = self.context.lock().unwrap();
        ctx.observers.remove(&observer_id);
        ctx.unlink_observer(observer_id);
    }

    fn clear(&mut self) {
        let mut ctx = self.context.lock().unwrap();
        ctx.clear();
    }
}

/// Hybrid reactive runtime for managing reactive primitives.
///
/// Supports both global runtime (default) and scoped runtimes for isolation.
/// The runtime tracks dependencies between signals, memos, and effects, and
/// drives change propagation through the reactive graph.
///
/// # Examples
///
/// Using the default global runtime:
///
/// ```
/// use quark::Signal;
///
/// let signal = Signal::new(42);
/// assert_eq!(signal.get(), 42);
/// ```
///
/// Using scoped runtimes for isolation:
///
/// ```
/// use quark::runtime::ReactiveRuntime;
/// use quark::Signal;
///
/// ReactiveRuntime::scope(|| {
///     let signal = Signal::new(0);
///     assert_eq!(signal.get(), 0);
/// });
/// // Runtime and all its state is dropped here
/// ```
pub struct ReactiveRuntime {
    next_id: AtomicUsize,
    inner: Arc<RwLock<RuntimeInner>>,
}

// Thread-local stack for scoped runtimes
thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Arc<ReactiveRuntime>>> = RefCell::new(vec![]);
}

impl ReactiveRuntime {
    /// Create a new isolated runtime.
    fn new() -> Arc<Self> {
        Arc::new(ReactiveRuntime {
            next_id: AtomicUsize::new(0),
            inner: Arc::new(RwLock::new(RuntimeInner::new())),
        })
    }

    /// Run a function with a fresh isolated runtime.
    ///
    /// Useful for testing or creating isolated reactive contexts. The runtime
    /// and all its state is automatically cleaned up when the function
    /// returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::runtime::ReactiveRuntime;
    /// use quark::Signal;
    ///
    /// ReactiveRuntime::scope(|| {
    ///     let signal = Signal::new(0);
    ///     assert_eq!(signal.get(), 0);
    /// });
    /// ```
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let runtime = Self::new();
        Self::with_runtime(runtime, f)
    }

    /// Get or create the global runtime (fallback).
    ///
    /// This is used as the default runtime when no scoped runtime is active.
    pub fn global() -> Arc<Self> {
        use std::sync::OnceLock;
        static RUNTIME: OnceLock<Arc<ReactiveRuntime>> = OnceLock::new();
        Arc::clone(RUNTIME.get_or_init(Self::new))
    }

    /// Get the current reactive runtime (scoped or global fallback).
    ///
    /// Returns the runtime from the top of the thread-local stack, or the
    /// global runtime if no scoped runtime is active.
    pub fn current() -> Arc<Self> {
        RUNTIME_STACK.with(|stack| stack.borrow().last().cloned().unwrap_or_else(Self::global))
    }

    /// Run a function with a specific runtime as the current context.
    ///
    /// This pushes the runtime onto the thread-local stack for the duration
    /// of the function execution.
    pub fn with_runtime<F, R>(runtime: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().push(runtime);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Clear all observers, dependencies, and state from this runtime.
    ///
    /// Useful for resetting between tests.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.clear();
        self.next_id.store(0, Ordering::SeqCst);
    }

    /// Get a reference to the inner runtime state.
    pub(crate) fn inner(&self) -> Arc<RwLock<RuntimeInner>> {
        Arc::clone(&self.inner)
    }

    /// Generate the next unique ID for a reactive primitive.
    pub fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Track a read of a source by the current observer.
    ///
    /// Does nothing when no observer is active or an untracked scope is open.
    pub fn track_read(&self, source_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        if ctx.untracked_depth > 0 {
            return;
        }
        if let Some(current_observer) = ctx.current_observer {
            ctx.dependencies
                .entry(source_id)
                .or_default()
                .insert(current_observer);
            ctx.observer_deps
                .entry(current_observer)
                .or_default()
                .insert(source_id);
        }
    }

    /// Run a function inside an untracked scope.
    ///
    /// Reads performed by `f` register no dependencies in the calling
    /// computation. Entering an observer scope (a memo recomputation or an
    /// effect run) re-enables tracking for that scope.
    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            ctx.untracked_depth += 1;
        }

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

        {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            ctx.untracked_depth -= 1;
        }

        match result {
            Ok(r) => r,
            Err(e) => std::panic::resume_unwind(e),
        }
    }

    /// Notify all observers that depend on a source.
    pub fn notify_observers(&self, source_id: usize) {
        let observers = {
            let inner = self.inner.read().unwrap();
            let ctx = inner.context.lock().unwrap();
            ctx.dependencies
                .get(&source_id)
                .map(|obs| obs.iter().copied().collect::<Vec<_>>())
        };

        if let Some(observers) = observers {
            for observer_id in observers {
                self.mark_observer_dirty(observer_id);
            }
        }
    }

    /// Mark an observer (memo or effect) as dirty and propagate to dependents.
    fn mark_observer_dirty(&self, observer_id: usize) {
        let (is_memo, already_dirty, gate) = {
            let inner = self.inner.read().unwrap();
            let ctx = inner.context.lock().unwrap();
            (
                ctx.memo_dirty.contains_key(&observer_id),
                ctx.memo_dirty.get(&observer_id).copied().unwrap_or(false),
                ctx.memo_gates.get(&observer_id).cloned(),
            )
        };

        if is_memo {
            // Change-gated memo: recompute now and stop propagation when the
            // comparator reports the cached value did not change.
            if let Some(gate) = gate {
                if gate() {
                    self.notify_dependents(observer_id);
                }
                return;
            }

            if already_dirty {
                return;
            }
            {
                let inner = self.inner.read().unwrap();
                let mut ctx = inner.context.lock().unwrap();
                ctx.memo_dirty.insert(observer_id, true);
            }
            self.notify_dependents(observer_id);
            return;
        }

        // Effects run immediately, re-tracking their dependencies.
        self.run_observer(observer_id);
    }

    fn notify_dependents(&self, source_id: usize) {
        let dependents = {
            let inner = self.inner.read().unwrap();
            let ctx = inner.context.lock().unwrap();
            ctx.dependencies
                .get(&source_id)
                .map(|deps| deps.iter().copied().collect::<Vec<_>>())
        };

        if let Some(dependents) = dependents {
            for dependent_id in dependents {
                self.mark_observer_dirty(dependent_id);
            }
        }
    }

    /// Register a function to run whenever one of its tracked reads changes.
    pub fn create_observer<F>(&self, observer_id: usize, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.observers.insert(observer_id, Arc::new(f));
    }

    /// Run a registered observer, re-establishing its dependency set.
    pub fn run_observer(&self, observer_id: usize) {
        let observer = {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            let observer = ctx.observers.get(&observer_id).cloned();
            if observer.is_some() {
                // Dependencies are re-tracked on every run so conditional
                // reads keep the graph accurate.
                ctx.unlink_observer(observer_id);
            }
            observer
        };

        if let Some(observer) = observer {
            self.with_observer(observer_id, || observer());
        }
    }

    /// Drop an observer's current dependency set.
    ///
    /// Memos call this before recomputing so conditional reads from previous
    /// runs do not linger in the graph.
    pub fn clear_observer_deps(&self, observer_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.unlink_observer(observer_id);
    }

    /// Run a function with a specific observer as the current context.
    ///
    /// Tracking is re-enabled inside the observer scope even when the caller
    /// sits inside an untracked scope; the observer's own dependencies must
    /// still be recorded.
    pub fn with_observer<F, R>(&self, observer_id: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let (prev_observer, prev_untracked) = {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            let prev = ctx.current_observer.replace(observer_id);
            let depth = std::mem::take(&mut ctx.untracked_depth);
            (prev, depth)
        };

        let result = f();

        {
            let inner = self.inner.read().unwrap();
            let mut ctx = inner.context.lock().unwrap();
            ctx.current_observer = prev_observer;
            ctx.untracked_depth = prev_untracked;
        }

        result
    }

    /// Register a memo and mark it as dirty initially.
    pub fn register_memo(&self, memo_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.memo_dirty.insert(memo_id, true);
    }

    /// Attach a change gate to a memo.
    ///
    /// A gated memo recomputes eagerly when invalidated; the gate returns
    /// whether the cached value changed, and propagation stops when it did
    /// not.
    pub fn register_memo_gate<F>(&self, memo_id: usize, gate: F)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.memo_gates.insert(memo_id, Arc::new(gate));
    }

    /// Check if a memo is dirty (needs recomputation).
    pub fn is_memo_dirty(&self, memo_id: usize) -> bool {
        let inner = self.inner.read().unwrap();
        let ctx = inner.context.lock().unwrap();
        ctx.memo_dirty.get(&memo_id).copied().unwrap_or(true)
    }

    /// Mark a memo as clean (after recomputation).
    pub fn mark_memo_clean(&self, memo_id: usize) {
        let inner = self.inner.read().unwrap();
        let mut ctx = inner.context.lock().unwrap();
        ctx.memo_dirty.insert(memo_id, false);
    }
}

/// Read reactive state without registering dependencies.
///
/// Runs `f` inside an untracked scope on the current runtime: any tracked
/// reads performed by `f` register no dependency in the calling computation.
///
/// # Examples
///
/// ```
/// use quark::{untrack, Signal};
///
/// let signal = Signal::new(3);
/// let value = untrack(|| signal.get());
/// assert_eq!(value, 3);
/// ```
pub fn untrack<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    ReactiveRuntime::current().with_untracked(f)
}
