//! The atom handle and its combinators.
//!
//! An [`Atom`] bundles one tracked read and one write into a single named
//! value. Everything else in this module derives new handles from existing
//! ones: memoized reads, bidirectional conversion, deferred cancellable
//! writes, mutually exclusive boolean selections, bindable sourcing with a
//! local fallback, and field-level views over reactive objects.

mod atom;
mod defer;
mod error;
mod prop;
mod selector;
mod source;

pub use atom::Atom;
pub use defer::{CancelDeferred, Trigger};
pub use error::AtomError;
pub use selector::AtomSelector;
