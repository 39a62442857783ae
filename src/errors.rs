//! Centralized error handling for the zarrdump application.
//!
//! The two user-facing failures (missing input path, missing variable name)
//! carry their exact CLI messages in their `Display` impls, so the binary
//! can print any error and exit without special-casing. Errors coming out of
//! the underlying store reader pass through transparently with whatever
//! diagnostic the library produced.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for zarrdump operations.
#[derive(Error, Debug)]
pub enum ZarrDumpError {
    /// The input path does not exist; reported before any store is opened.
    #[error("zarrdump: cannot access {}: no such file", .path.display())]
    CannotAccess { path: PathBuf },

    /// A name from the `-v` list is not a variable of the dataset.
    #[error("Variable {var} not found in {}", .path.display())]
    VariableNotFound { var: String, path: PathBuf },

    /// Store could not be created over the given path
    #[error(transparent)]
    StoreCreate(#[from] zarrs::filesystem::FilesystemStoreCreateError),

    /// Store listing or key access failed
    #[error(transparent)]
    Storage(#[from] zarrs::storage::StorageError),

    /// Root group metadata was present but unreadable
    #[error(transparent)]
    GroupCreate(#[from] zarrs::group::GroupCreateError),

    /// Array metadata was present but unreadable
    #[error(transparent)]
    ArrayCreate(#[from] zarrs::array::ArrayCreateError),

    /// Array data retrieval failed
    #[error(transparent)]
    Array(#[from] zarrs::array::ArrayError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dump was requested for an element type the formatter cannot render.
    #[error("unsupported data type for value dump: {dtype}")]
    UnsupportedDataType { dtype: String },
}

/// Convenience type alias for Results with ZarrDumpError
pub type Result<T> = std::result::Result<T, ZarrDumpError>;
