use crate::atom::AtomError;
use crate::runtime::untrack;
use crate::signal::{Memo, ReadSignal, Signal, WriteSignal};
use std::sync::Arc;

pub(crate) type ReadFn<T> = Arc<dyn Fn() -> T + Send + Sync>;
pub(crate) type WriteFn<T> = Arc<dyn Fn(T) -> Result<(), AtomError> + Send + Sync>;

/// A readable and writable reactive value bundled into one named handle.
///
/// An atom pairs one tracked read with one write. It never owns storage
/// itself: storage belongs to whichever [`Signal`] or closure state its two
/// halves close over, and the halves may come from different sources.
/// Combinators ([`memo`](Atom::memo), [`convert`](Atom::convert),
/// [`defer`](Atom::defer), [`selector`](Atom::selector), ...) return new
/// handles over the same underlying sources; cloning an atom clones the
/// handle, not the value.
///
/// # Examples
///
/// ```
/// use quark::Atom;
///
/// let count = Atom::value(1);
/// count.set(count.get() + 1);
/// assert_eq!(count.get(), 2);
/// ```
pub struct Atom<T> {
    pub(crate) read: ReadFn<T>,
    pub(crate) write: WriteFn<T>,
}

impl<T> Clone for Atom<T> {
    fn clone(&self) -> Self {
        Self {
            read: Arc::clone(&self.read),
            write: Arc::clone(&self.write),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Atom<T> {
    pub(crate) fn from_parts(read: ReadFn<T>, write: WriteFn<T>) -> Self {
        Self { read, write }
    }

    /// Create an atom from a plain getter and setter.
    pub fn new<G, S>(read: G, write: S) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            write: Arc::new(move |value| {
                write(value);
                Ok(())
            }),
        }
    }

    /// Create an atom without a setter.
    ///
    /// Reads pass through; every write fails with
    /// [`AtomError::NoSetter`] ([`set`](Atom::set) panics with its message).
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::Atom;
    ///
    /// let five = Atom::read_only(|| 5);
    /// assert_eq!(five.get(), 5);
    /// assert!(five.try_set(1).is_err());
    /// ```
    pub fn read_only<G>(read: G) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            write: Arc::new(|_| {
                Err(AtomError::NoSetter {
                    kind: "read-only atom",
                })
            }),
        }
    }

    /// Create an atom over a fresh signal holding `initial`.
    pub fn value(initial: T) -> Self {
        Signal::new(initial).into()
    }

    /// Create an atom over a fresh signal with an equality-skip policy.
    ///
    /// Writes that compare equal to the current value notify nobody.
    pub fn value_with_equals<E>(initial: T, equals: E) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Signal::with_equals(initial, equals).into()
    }

    /// Get the current value (tracked).
    ///
    /// Calling this inside a reactive computation registers a dependency.
    pub fn get(&self) -> T {
        (self.read)()
    }

    /// Set a new value.
    ///
    /// Downstream notification is decided by whatever cell ultimately backs
    /// this atom.
    ///
    /// # Panics
    ///
    /// Panics when the underlying writer reports an error, i.e. the atom or
    /// its ancestor is read-only.
    pub fn set(&self, value: T) {
        if let Err(err) = (self.write)(value) {
            panic!("{err}");
        }
    }

    /// Set a new value, returning the write error instead of panicking.
    pub fn try_set(&self, value: T) -> Result<(), AtomError> {
        (self.write)(value)
    }

    /// Read the current value untracked, apply `f`, write the result back.
    ///
    /// The read registers no dependency in the calling computation. Returns
    /// the written value.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::Atom;
    ///
    /// let count = Atom::value(1);
    /// assert_eq!(count.update(|n| n + 1), 2);
    /// assert_eq!(count.get(), 2);
    /// ```
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(T) -> T,
    {
        let previous = untrack(|| self.get());
        let next = f(previous);
        self.set(next.clone());
        next
    }

    /// Write the current value back unchanged.
    ///
    /// This still performs a write; whether observers are notified depends
    /// entirely on the backing cell's equality-skip policy (see
    /// [`Atom::value_with_equals`]), which this layer does not override.
    pub fn touch(&self) -> T {
        self.update(|value| value)
    }

    /// Memoize reads of this atom.
    ///
    /// The returned atom shares this atom's setter; its getter is a cached
    /// dependency-tracked read that recomputes only when the underlying
    /// sources change.
    pub fn memo(&self) -> Atom<T> {
        let read = Arc::clone(&self.read);
        let memo = Memo::new(move || read());
        Self {
            read: Arc::new(move || memo.get()),
            write: Arc::clone(&self.write),
        }
    }

    /// Memoize reads with a custom equality comparator.
    ///
    /// The comparator is forwarded to the memo: recomputations whose result
    /// compares equal to the cached value do not notify observers.
    pub fn memo_by<E>(&self, equals: E) -> Atom<T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let read = Arc::clone(&self.read);
        let memo = Memo::with_equals(move || read(), equals);
        Self {
            read: Arc::new(move || memo.get()),
            write: Arc::clone(&self.write),
        }
    }

    /// Convert this atom bidirectionally into another type.
    ///
    /// `get() = to(self.get())` and `set(v) = self.set(from(v))`. Purely
    /// functional: no caching, and panics raised by `to`/`from` propagate
    /// unmodified to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::Atom;
    ///
    /// let celsius = Atom::value(0.0_f64);
    /// let fahrenheit = celsius.convert(|c| c * 9.0 / 5.0 + 32.0, |f: f64| (f - 32.0) * 5.0 / 9.0);
    ///
    /// assert_eq!(fahrenheit.get(), 32.0);
    /// fahrenheit.set(212.0);
    /// assert_eq!(celsius.get(), 100.0);
    /// ```
    pub fn convert<U, G, S>(&self, to: G, from: S) -> Atom<U>
    where
        U: Clone + Send + Sync + 'static,
        G: Fn(T) -> U + Send + Sync + 'static,
        S: Fn(U) -> T + Send + Sync + 'static,
    {
        let read = Arc::clone(&self.read);
        let write = Arc::clone(&self.write);
        Atom {
            read: Arc::new(move || to(read())),
            write: Arc::new(move |value| write(from(value))),
        }
    }

    /// Whether two handles forward to the same getter and setter.
    pub fn same_source(&self, other: &Atom<T>) -> bool {
        Arc::ptr_eq(&self.read, &other.read) && Arc::ptr_eq(&self.write, &other.write)
    }
}

impl<T: Clone + Send + Sync + 'static> From<Signal<T>> for Atom<T> {
    /// Wrap a reactive cell into an atom.
    fn from(cell: Signal<T>) -> Self {
        let reader = cell.clone();
        Self {
            read: Arc::new(move || reader.get()),
            write: Arc::new(move |value| {
                cell.set(value);
                Ok(())
            }),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> From<(ReadSignal<T>, WriteSignal<T>)> for Atom<T> {
    /// Bundle the raw pair-of-functions primitive back into one handle.
    fn from((read, write): (ReadSignal<T>, WriteSignal<T>)) -> Self {
        Self {
            read: Arc::new(move || read.get()),
            write: Arc::new(move |value| {
                write.set(value);
                Ok(())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::create_signal;

    #[test]
    fn value_round_trip() {
        let atom = Atom::value(1);
        atom.set(7);
        assert_eq!(atom.get(), 7);
    }

    #[test]
    fn update_increments() {
        let atom = Atom::value(1);
        let out = atom.update(|n| n + 1);
        assert_eq!(out, 2);
        assert_eq!(atom.get(), 2);
    }

    #[test]
    fn convert_round_trip() {
        let base = Atom::value(2);
        let doubled = base.convert(|n| n * 2, |n: i32| n / 2);

        assert_eq!(doubled.get(), 4);
        doubled.set(10);
        assert_eq!(base.get(), 5);
    }

    #[test]
    fn memo_shares_setter() {
        let base = Atom::value(3);
        let memoized = base.memo();

        assert_eq!(memoized.get(), 3);
        memoized.set(4);
        assert_eq!(base.get(), 4);
        assert_eq!(memoized.get(), 4);
    }

    #[test]
    #[should_panic(expected = "no setter defined on read-only atom")]
    fn read_only_set_panics() {
        let atom = Atom::read_only(|| 5);
        atom.set(1);
    }

    #[test]
    fn read_only_try_set_errors() {
        let atom = Atom::read_only(|| 5);
        assert_eq!(atom.get(), 5);
        assert_eq!(
            atom.try_set(1),
            Err(AtomError::NoSetter {
                kind: "read-only atom"
            })
        );
    }

    #[test]
    fn from_split_pair() {
        let (read, write) = create_signal(0);
        let atom: Atom<i32> = (read, write).into();
        atom.set(9);
        assert_eq!(atom.get(), 9);
    }

    #[test]
    fn same_source_tracks_handle_identity() {
        let a = Atom::value(0);
        let b = a.clone();
        let c = Atom::value(0);

        assert!(a.same_source(&b));
        assert!(!a.same_source(&c));
    }
}
