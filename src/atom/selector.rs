use crate::atom::{Atom, AtomError};
use crate::runtime::untrack;
use crate::signal::Selector;
use std::sync::Arc;

/// Factory for two-way boolean views over one atom, built by
/// [`Atom::selector`].
///
/// Each view produced by [`select`](AtomSelector::select) reads as "does my
/// candidate equal the parent's current value" and writes radio-button
/// style: setting one view true moves the parent to its candidate, which
/// deselects every other view through the shared parent value.
pub struct AtomSelector<T> {
    parent: Atom<T>,
    core: Selector<T>,
}

impl<T> Clone for AtomSelector<T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            core: self.core.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Atom<T> {
    /// Build a selector factory comparing candidates with `PartialEq`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quark::Atom;
    ///
    /// let picked = Atom::value("red");
    /// let group = picked.selector();
    ///
    /// let red = group.select(|| "red", "");
    /// let blue = group.select(|| "blue", "");
    ///
    /// assert!(red.get());
    /// blue.set(true);
    /// assert!(!red.get());
    /// assert_eq!(picked.get(), "blue");
    /// ```
    pub fn selector(&self) -> AtomSelector<T>
    where
        T: PartialEq,
    {
        self.selector_by(|a, b| a == b)
    }

    /// Build a selector factory with a custom comparator.
    ///
    /// The factory is built once; all views it produces share one memoized
    /// read of this atom, so their observers are only notified when their
    /// own truth value flips.
    pub fn selector_by<E>(&self, equals: E) -> AtomSelector<T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let read = Arc::clone(&self.read);
        let core = Selector::with_equals(move || read(), equals);
        AtomSelector {
            parent: self.clone(),
            core,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> AtomSelector<T> {
    /// Produce the boolean view for one candidate.
    ///
    /// - `get()`: whether `candidate()` equals the parent's current value.
    /// - `set(true)`: parent becomes `candidate()`.
    /// - `set(false)`: no-op unless this candidate is the one currently
    ///   selected, in which case the parent resets to `default_value`
    ///   rather than being left undefined.
    pub fn select<F>(&self, candidate: F, default_value: T) -> Atom<bool>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let candidate: Arc<dyn Fn() -> T + Send + Sync> = Arc::new(candidate);

        let is_selected = self.core.selects({
            let candidate = Arc::clone(&candidate);
            move || candidate()
        });

        let parent = self.parent.clone();
        let equals = self.core.equals();
        let write = move |on: bool| -> Result<(), AtomError> {
            if on {
                parent.try_set(candidate())
            } else {
                let currently_selected = untrack(|| equals(&candidate(), &parent.get()));
                if currently_selected {
                    parent.try_set(default_value.clone())
                } else {
                    Ok(())
                }
            }
        };

        Atom::from_parts(Arc::new(move || is_selected.get()), Arc::new(write))
    }
}
