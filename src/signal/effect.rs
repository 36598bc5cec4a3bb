use crate::runtime::{ReactiveRuntime, RuntimeInner};
use std::sync::{RwLock, Weak};

/// A side effect that runs when its dependencies change.
///
/// Effects automatically track signal reads and re-run when those signals
/// change. The effect runs immediately on creation to establish initial
/// dependencies, and is deregistered when the handle is dropped.
///
/// # Examples
///
/// ```
/// use quark::{Effect, Signal};
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// let signal = Signal::new(5);
/// let last_value = Arc::new(AtomicI32::new(0));
/// let last_value_clone = last_value.clone();
///
/// let _effect = Effect::new({
///     let signal = signal.clone();
///     move || {
///         let val = signal.get();
///         last_value_clone.store(val, Ordering::SeqCst);
///     }
/// });
///
/// // Effect runs immediately
/// assert_eq!(last_value.load(Ordering::SeqCst), 5);
///
/// signal.set(10);
/// assert_eq!(last_value.load(Ordering::SeqCst), 10);
/// ```
pub struct Effect {
    id: usize,
    runtime: Weak<RwLock<RuntimeInner>>,
}

impl Effect {
    /// Create a new effect that runs when dependencies change.
    ///
    /// The effect function runs immediately to establish initial
    /// dependencies, then re-runs whenever any tracked source changes.
    /// Dependencies are re-tracked on every run.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();

        runtime.create_observer(id, effect);
        runtime.run_observer(id);

        Self {
            id,
            runtime: std::sync::Arc::downgrade(&runtime.inner()),
        }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.upgrade() {
            if let Ok(mut runtime) = runtime.write() {
                runtime.remove_observer(self.id);
            }
        }
    }
}

/// Create a new effect that runs when dependencies change.
///
/// The returned handle must be kept alive; dropping it deregisters the
/// effect.
pub fn create_effect<F>(effect: F) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::new(effect)
}
