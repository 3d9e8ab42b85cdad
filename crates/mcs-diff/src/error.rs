//! Error types for the diff crate.

/// Errors that can occur while preparing documents for comparison.
///
/// Mismatches between documents are never errors; they are reported as
/// [`crate::DiffResult`] entries.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A position that must hold a mapping held something else.
    #[error("invalid input shape at {path}: expected an object, got {found}")]
    InvalidShape { path: String, found: &'static str },
}

/// Convenience alias for fallible diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;
