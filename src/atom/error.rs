use thiserror::Error;

/// Errors surfaced by atom writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomError {
    /// The atom was built without a setter.
    #[error("no setter defined on {kind}")]
    NoSetter {
        /// Which kind of atom rejected the write.
        kind: &'static str,
    },
}
