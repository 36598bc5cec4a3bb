use crate::signal::Memo;
use std::sync::Arc;

/// Efficient membership checks against a moving target.
///
/// A `Selector` wraps a source read and hands out boolean tracked reads, one
/// per candidate. Each boolean is backed by a change-gated memo, so an
/// observer of `selects(..)` is only re-run when its own truth value flips,
/// not on every change of the source.
///
/// # Examples
///
/// ```
/// use quark::{Selector, Signal};
///
/// let picked = Signal::new("red");
/// let selector = Selector::new({
///     let picked = picked.clone();
///     move || picked.get()
/// });
///
/// let is_red = selector.selects(|| "red");
/// let is_blue = selector.selects(|| "blue");
/// assert!(is_red.get());
/// assert!(!is_blue.get());
///
/// picked.set("blue");
/// assert!(!is_red.get());
/// assert!(is_blue.get());
/// ```
pub struct Selector<T> {
    source: Memo<T>,
    equals: Arc<dyn Fn(&T, &T) -> bool + Send + Sync>,
}

impl<T: Clone + Send + Sync + 'static> Selector<T> {
    /// Create a selector over a source read, comparing with `PartialEq`.
    pub fn new<F>(source: F) -> Self
    where
        T: PartialEq,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_equals(source, |a, b| a == b)
    }

    /// Create a selector with a custom comparator.
    pub fn with_equals<F, E>(source: F, equals: E) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let equals: Arc<dyn Fn(&T, &T) -> bool + Send + Sync> = Arc::new(equals);
        let source = Memo::with_equals(source, {
            let equals = Arc::clone(&equals);
            move |a, b| equals(a, b)
        });
        Self { source, equals }
    }

    /// Build a tracked boolean read: does the candidate equal the source?
    ///
    /// Observers of the returned memo are notified only when the comparison
    /// result changes.
    pub fn selects<F>(&self, candidate: F) -> Memo<bool>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let source = self.source.clone();
        let equals = Arc::clone(&self.equals);
        Memo::with_equals(
            move || equals(&candidate(), &source.get()),
            |a, b| a == b,
        )
    }

    /// The comparator this selector was built with.
    pub(crate) fn equals(&self) -> Arc<dyn Fn(&T, &T) -> bool + Send + Sync> {
        Arc::clone(&self.equals)
    }
}

impl<T> Clone for Selector<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            equals: Arc::clone(&self.equals),
        }
    }
}
