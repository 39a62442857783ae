//! The reporter: structural summary plus ordered variable dumps.
//!
//! Everything the CLI prints on success flows through [`write_report`], so
//! integration tests can drive the exact contract against an in-memory
//! buffer instead of a child process.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::dataset::{Dataset, OpenOptions};
use crate::errors::{Result, ZarrDumpError};
use crate::metadata::write_summary;
use crate::values::format_values;

/// Runs the full dump of the store at `path` against `out`.
///
/// Verifies the path exists before anything is opened, opens the dataset
/// with `options`, writes the structural summary, then dumps each requested
/// variable in list order. The first missing name fails the invocation:
/// dumps already written stay on the stream and later names are never
/// looked up. The dataset handle is released when this function returns,
/// on success and on error alike.
pub fn write_report<W: Write>(
    path: &Path,
    variables: Option<&[String]>,
    options: OpenOptions,
    out: &mut W,
) -> Result<()> {
    if !path.exists() {
        return Err(ZarrDumpError::CannotAccess {
            path: path.to_path_buf(),
        });
    }

    let dataset = Dataset::open(path, options)?;
    write_summary(&dataset, out)?;

    let Some(names) = variables else {
        return Ok(());
    };

    writeln!(out)?;
    for name in names {
        let Some(var) = dataset.variable(name) else {
            return Err(ZarrDumpError::VariableNotFound {
                var: name.clone(),
                path: path.to_path_buf(),
            });
        };
        debug!(variable = name.as_str(), "dumping variable");
        let rendered = format_values(var, options)?;
        writeln!(out, "{name} = {rendered}")?;
        writeln!(out)?;
    }

    Ok(())
}
