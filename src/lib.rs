//! # Quark
//!
//! Composable two-way reactive atoms for Rust.
//!
//! Quark provides two levels of abstraction for reactive state:
//!
//! ## Signals (Low-level primitives)
//!
//! Fine-grained reactive primitives for building reactive systems:
//! - `Signal<T>` - Reactive values that notify dependents when changed
//! - `Memo<T>` - Computed values that automatically track dependencies
//! - `Effect` - Side effects that run when dependencies change
//! - `Selector<T>` - Membership checks against a moving target
//!
//! ## Atoms (The handle layer)
//!
//! `create_signal` hands out a bare `(ReadSignal, WriteSignal)` tuple; an
//! [`Atom`] bundles that pair back into one named value with combinators
//! for two-way data binding:
//! - `memo` / `memo_by` - memoized reads sharing the original setter
//! - `convert` - bidirectional type conversion
//! - `update` / `touch` - untracked read-modify-write
//! - `defer` - cancellable scheduled writes
//! - `selector` - mutually exclusive boolean views (radio-button semantics)
//! - `unwrap` / `source` - follow an externally bindable atom with a
//!   persistent local fallback
//! - `prop` - bind to one field of a reactive object
//!
//! ```
//! use quark::Atom;
//!
//! let count = Atom::value(1);
//! count.update(|n| n + 1);
//! assert_eq!(count.get(), 2);
//! ```

pub mod atom;
pub mod runtime;
pub mod signal;

// Re-export main types for convenience
pub use atom::{Atom, AtomError, AtomSelector, CancelDeferred, Trigger};
pub use runtime::untrack;
pub use signal::{
    create_effect, create_signal, Effect, Memo, ReadSignal, Selector, Signal, WriteSignal,
};
