use crate::atom::Atom;
use crate::signal::{Memo, Signal};
use std::sync::{Arc, Mutex};

impl<T: Clone + Send + Sync + 'static> Atom<T> {
    /// Forward reads and writes through an atom resolved on every access.
    ///
    /// `resolve` runs again for each `get`/`set`, so when the atom it
    /// returns changes identity, the next access targets the new one with
    /// no stale reference.
    pub fn unwrap<F>(resolve: F) -> Atom<T>
    where
        F: Fn() -> Atom<T> + Send + Sync + 'static,
    {
        let resolve = Arc::new(resolve);
        let read = {
            let resolve = Arc::clone(&resolve);
            move || resolve().get()
        };
        let write = move |value: T| resolve().try_set(value);
        Atom::from_parts(Arc::new(read), Arc::new(write))
    }

    /// [`Atom::source_with`] with a default-valued private cell.
    pub fn source<B>(bind: B) -> Atom<T>
    where
        T: Default,
        B: Fn() -> Option<Atom<T>> + Send + Sync + 'static,
    {
        Self::source_with(bind, || Signal::new(T::default()))
    }

    /// An atom that follows an externally bindable source, with a local
    /// fallback cell.
    ///
    /// `bind` is wrapped in a memoized resolution that propagates only when
    /// the resolved handle actually changes. While `bind` returns an atom,
    /// reads and writes forward to it unchanged; while it returns `None`, a
    /// private cell — created once, lazily, via `cell_factory` — takes over
    /// and keeps whatever was written to it across recomputations.
    ///
    /// There is never a reconciliation pass: switching away from external
    /// control does not copy the external value into the fallback, and
    /// switching back does not copy the fallback into the external atom.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::{Atom, Signal};
    ///
    /// let binding = Signal::new(None::<Atom<i32>>);
    /// let local = Atom::source({
    ///     let binding = binding.clone();
    ///     move || binding.get()
    /// });
    ///
    /// // Unbound: writes go to the private fallback cell.
    /// local.set(7);
    /// assert_eq!(local.get(), 7);
    ///
    /// // Bound: reads and writes forward to the supplied atom.
    /// let external = Atom::value(100);
    /// binding.set(Some(external.clone()));
    /// assert_eq!(local.get(), 100);
    /// local.set(101);
    /// assert_eq!(external.get(), 101);
    ///
    /// // Unbound again: the fallback kept its last value.
    /// binding.set(None);
    /// assert_eq!(local.get(), 7);
    /// ```
    pub fn source_with<B, C>(bind: B, cell_factory: C) -> Atom<T>
    where
        B: Fn() -> Option<Atom<T>> + Send + Sync + 'static,
        C: Fn() -> Signal<T> + Send + Sync + 'static,
    {
        let fallback: Arc<Mutex<Option<Atom<T>>>> = Arc::new(Mutex::new(None));
        let resolved = Memo::with_equals(
            move || match bind() {
                Some(bound) => bound,
                None => fallback
                    .lock()
                    .unwrap()
                    .get_or_insert_with(|| Atom::from(cell_factory()))
                    .clone(),
            },
            |a, b| a.same_source(b),
        );
        Atom::unwrap(move || resolved.get())
    }
}
