//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent invalid study descriptions.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{kind} not found: {path}")]
    PathNotFound { kind: &'static str, path: PathBuf },

    #[error("{kind} is not a file: {path}")]
    NotAFile { kind: &'static str, path: PathBuf },

    #[error("{kind} is not a directory: {path}")]
    NotADirectory { kind: &'static str, path: PathBuf },

    #[error("--{option} has {actual} value(s), expected {expected} (one per timepoint)")]
    LengthMismatch {
        option: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("no timepoints given")]
    NoTimepoints,

    #[error("duplicate timepoint id: {0}")]
    DuplicateTimepoint(String),

    #[error("invalid subject id '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },
}
