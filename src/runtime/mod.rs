//! Runtime support for reactive primitives.
//!
//! This module provides the infrastructure for dependency tracking,
//! reactive graph management, and execution contexts.

mod context;

pub use context::{untrack, ReactiveRuntime};
pub(crate) use context::RuntimeInner;
