//! Defines command-line interface options using `clap` for the zarrdump application.

use clap::Parser;
use std::path::PathBuf;

/// A CLI tool for inspecting Zarr stores
#[derive(Parser, Debug)]
#[command(
    version = "0.1.0",
    name = "zarrdump",
    about = "Print the structure of a Zarr store, and optionally full variable values"
)]
pub struct Args {
    /// Path to the Zarr store
    pub file: PathBuf,

    /// Comma-separated variable names to dump in full, e.g. -v temp,salinity
    #[arg(short = 'v', long = "variables")]
    pub variables: Option<String>,
}

impl Args {
    /// Ordered variable-name list from the `-v` flag.
    ///
    /// The flag value is split on `,` exactly as given: no whitespace
    /// trimming, no empty-segment filtering. `None` when the flag is absent.
    pub fn variable_list(&self) -> Option<Vec<String>> {
        self.variables
            .as_ref()
            .map(|list| list.split(',').map(str::to_string).collect())
    }
}
