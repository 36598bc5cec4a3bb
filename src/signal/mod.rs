//! Fine-grained reactive primitives.
//!
//! This module provides the core building blocks for reactive programming:
//! - Signals: Reactive state containers
//! - Memos: Cached computed values
//! - Effects: Side effects that react to changes
//! - Selectors: Membership checks against a moving target

mod effect;
mod memo;
mod selector;
mod signal;

pub use effect::{create_effect, Effect};
pub use memo::Memo;
pub use selector::Selector;
pub use signal::{create_signal, ReadSignal, Signal, WriteSignal};
