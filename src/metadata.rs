//! Structural summary reporting for open datasets.
//!
//! Renders the dimensions, coordinates, data variables, and global
//! attributes of a [`Dataset`] in a fixed human-readable layout. Output
//! streams into any `io::Write`, so repeat runs are byte-identical and
//! tests can capture exact bytes.

use std::io::Write;

use serde_json::Value;

use crate::dataset::{Dataset, Variable};
use crate::errors::Result;
use crate::values;

/// Writes the structural summary of `dataset` to `out`.
pub fn write_summary<W: Write>(dataset: &Dataset, out: &mut W) -> Result<()> {
    writeln!(out, "zarrdump of {}", dataset.path().display())?;

    write_section_header(out, " Dimensions")?;
    let dims = dataset.dimensions();
    if dims.is_empty() {
        writeln!(out, "   (No dimensions found)")?;
    } else {
        for (name, size) in &dims {
            writeln!(out, "    {name} = {size}")?;
        }
    }

    let coords = dataset.coordinate_names();

    write_section_header(out, " Coordinates")?;
    let mut listed = false;
    for var in dataset.variables() {
        if coords.contains(var.name()) {
            write_variable_entry(dataset, var, out)?;
            listed = true;
        }
    }
    if !listed {
        writeln!(out, "   (No coordinates found)")?;
    }

    write_section_header(out, " Data variables")?;
    let mut listed = false;
    for var in dataset.variables() {
        if !coords.contains(var.name()) {
            write_variable_entry(dataset, var, out)?;
            listed = true;
        }
    }
    if !listed {
        writeln!(out, "   (No data variables found)")?;
    }

    write_section_header(out, " Global attributes")?;
    if dataset.attributes().is_empty() {
        writeln!(out, "   (none)")?;
    } else {
        for (key, value) in dataset.attributes() {
            writeln!(out, "   - {key}: {}", format_attr_value(value))?;
        }
    }

    Ok(())
}

fn write_section_header<W: Write>(out: &mut W, header: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{header}")?;
    writeln!(out, "{}", "=".repeat(header.len() + 3))?;
    Ok(())
}

/// One variable line, `name (dtype): [dims] = (shape)`, with its visible
/// attributes beneath.
fn write_variable_entry<W: Write>(dataset: &Dataset, var: &Variable, out: &mut W) -> Result<()> {
    let dtype = var.dtype_name();
    if var.is_scalar() {
        writeln!(out, "    {} ({}): scalar", var.name(), dtype)?;
    } else {
        let dims = var.dimensions().join(", ");
        let shape = var
            .shape()
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" × ");
        writeln!(out, "    {} ({}): [{}] = ({})", var.name(), dtype, dims, shape)?;
    }

    let attrs = visible_attributes(dataset, var);
    if !attrs.is_empty() {
        writeln!(out, "      └─ {}", attrs.join(", "))?;
    }

    Ok(())
}

/// Attribute lines for a variable, in stored order.
///
/// `_ARRAY_DIMENSIONS` is structural (already shown as the dims list) and
/// never listed. With `decode_times` enabled, `units` and `calendar` of a
/// datetime-rendered variable are consumed by the decoding and omitted.
fn visible_attributes(dataset: &Dataset, var: &Variable) -> Vec<String> {
    let time_decoded = dataset.options().decode_times && values::time_encoding(var).is_some();
    var.attributes()
        .iter()
        .filter(|(key, _)| key.as_str() != "_ARRAY_DIMENSIONS")
        .filter(|(key, _)| !(time_decoded && matches!(key.as_str(), "units" | "calendar")))
        .map(|(key, value)| format!("{key}: {}", format_attr_value(value)))
        .collect()
}

fn format_attr_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
