use crate::runtime::ReactiveRuntime;
use std::sync::{Arc, RwLock};

type EqualsFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// A reactive signal that holds a value and notifies subscribers when changed.
#[derive(Clone)]
pub struct Signal<T> {
    value: Arc<RwLock<T>>,
    equals: Option<EqualsFn<T>>,
    id: usize,
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// Create a new signal with the given initial value.
    ///
    /// Every write notifies observers, even when the new value equals the
    /// old one. Use [`Signal::with_equals`] for an equality-skip policy.
    pub fn new(initial: T) -> Self {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();

        Self {
            value: Arc::new(RwLock::new(initial)),
            equals: None,
            id,
        }
    }

    /// Create a new signal that skips notification when the comparator
    /// reports the written value equal to the current one.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::Signal;
    ///
    /// let signal = Signal::with_equals(1, |a, b| a == b);
    /// signal.set(1); // no observer runs
    /// signal.set(2); // observers run
    /// assert_eq!(signal.get(), 2);
    /// ```
    pub fn with_equals<F>(initial: T, equals: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();

        Self {
            value: Arc::new(RwLock::new(initial)),
            equals: Some(Arc::new(equals)),
            id,
        }
    }

    /// Get the current value of the signal.
    pub fn get(&self) -> T {
        let runtime = ReactiveRuntime::current();
        runtime.track_read(self.id);
        self.value.read().unwrap().clone()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.read().unwrap().clone()
    }

    /// Set a new value for the signal.
    ///
    /// With an equality comparator installed, a write that compares equal to
    /// the current value is dropped entirely: no storage update, no
    /// notification.
    pub fn set(&self, new_value: T) {
        if let Some(equals) = &self.equals {
            let unchanged = equals(&self.value.read().unwrap(), &new_value);
            if unchanged {
                return;
            }
        }
        *self.value.write().unwrap() = new_value;
        let runtime = ReactiveRuntime::current();
        runtime.notify_observers(self.id);
    }

    /// Update the value using a function.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let unchanged = {
            let mut value = self.value.write().unwrap();
            let previous = self.equals.as_ref().map(|_| value.clone());
            f(&mut value);
            match (&self.equals, previous) {
                (Some(equals), Some(previous)) => equals(&previous, &value),
                _ => false,
            }
        }; // Release the write lock before notifying
        if unchanged {
            return;
        }
        let runtime = ReactiveRuntime::current();
        runtime.notify_observers(self.id);
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let runtime = ReactiveRuntime::current();
        runtime.track_read(self.id);
        let value = self.value.read().unwrap();
        f(&value)
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

/// The read half of a signal created with [`create_signal`].
#[derive(Clone)]
pub struct ReadSignal<T>(pub(crate) Signal<T>);

impl<T: Clone + Send + Sync + 'static> ReadSignal<T> {
    /// Get the current value (tracked).
    pub fn get(&self) -> T {
        self.0.get()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.0.get_untracked()
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }
}

/// The write half of a signal created with [`create_signal`].
#[derive(Clone)]
pub struct WriteSignal<T>(pub(crate) Signal<T>);

impl<T: Clone + Send + Sync + 'static> WriteSignal<T> {
    /// Set a new value.
    pub fn set(&self, new_value: T) {
        self.0.set(new_value);
    }

    /// Update the value using a function.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f);
    }
}

/// Create a signal split into its read and write halves.
///
/// The tuple form is the rawest primitive the crate exposes; the
/// [`Atom`](crate::Atom) handle bundles the two halves back into one named
/// value with combinators on top.
///
/// # Examples
///
/// ```
/// use quark::create_signal;
///
/// let (count, set_count) = create_signal(0);
/// assert_eq!(count.get(), 0);
/// set_count.set(42);
/// assert_eq!(count.get(), 42);
/// ```
pub fn create_signal<T: Clone + Send + Sync + 'static>(
    initial: T,
) -> (ReadSignal<T>, WriteSignal<T>) {
    let signal = Signal::new(initial);
    (ReadSignal(signal.clone()), WriteSignal(signal))
}
