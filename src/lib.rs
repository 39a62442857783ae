//! zarrdump: structural summaries and full value dumps of Zarr stores
//!
//! A command-line inspector for Zarr V2 and V3 stores. zarrdump opens a
//! store as a metadata-indexed dataset, prints a structural summary of its
//! dimensions, variables, and attributes, and optionally prints the fully
//! materialized values of named variables. All format decoding is delegated
//! to the `zarrs` crate; this crate is the thin reporting layer around it.
//!
//! ## Key Features
//!
//! - **Structural Summaries**: Dimensions, coordinates, data variables, and
//!   attributes in a fixed, byte-stable layout
//! - **Full Value Dumps**: Any variable materialized and printed as a nested
//!   array literal
//! - **Raw By Default**: Time and coordinate decoding are explicit switches,
//!   disabled by the CLI so stored values pass through unmodified
//! - **Zarr V2 & V3**: Both store versions, including the V2
//!   `_ARRAY_DIMENSIONS` dimension-name convention
//! - **Deterministic Output**: Repeat runs against an unmodified store are
//!   byte-identical
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line argument definitions
//! - [`dataset`]: Adapter opening a store as a dataset of named variables
//! - [`metadata`]: Structural summary rendering
//! - [`values`]: Value materialization and literal formatting
//! - [`report`]: The reporter driving summary and dumps in order
//! - [`errors`]: Centralized error handling
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use zarrdump::prelude::*;
//!
//! // Open a store with decoding disabled, the way the CLI does
//! let dataset = Dataset::open(Path::new("data.zarr"), OpenOptions::raw()).unwrap();
//!
//! // Write its structural summary into any io::Write
//! let mut out = Vec::new();
//! write_summary(&dataset, &mut out).unwrap();
//! ```
//!
//! ```rust,no_run
//! use std::path::Path;
//! use zarrdump::dataset::OpenOptions;
//! use zarrdump::report::write_report;
//!
//! // The whole CLI contract in one call: summary plus ordered dumps
//! let names = vec!["temp".to_string()];
//! let mut out = std::io::stdout();
//! write_report(Path::new("data.zarr"), Some(&names), OpenOptions::raw(), &mut out).unwrap();
//! ```

// Core modules
pub mod cli;
pub mod dataset;
pub mod errors;
pub mod metadata;
pub mod report;
pub mod values;

// Direct re-exports for the public API
pub use dataset::*;
pub use errors::*;
pub use metadata::*;
pub use report::*;
pub use values::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::dataset::{Dataset, OpenOptions, Variable};
    pub use crate::errors::{Result, ZarrDumpError};
    pub use crate::metadata::write_summary;
    pub use crate::report::write_report;
    pub use crate::values::format_values;
}
