//! Full-array materialization and literal rendering.
//!
//! Variables dump as nested bracket literals in row-major order. The common
//! element types retrieve through typed `ndarray` arrays; everything else
//! falls back to raw bytes rendered element by element through the data
//! type's own metadata formatter. With `decode_times` enabled, variables
//! carrying CF-style time units render as calendar datetimes instead of
//! their stored numbers.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use ndarray::ArrayD;
use serde_json::Value;
use tracing::debug;
use zarrs::array::{Array, ArrayBytes, DataType, ElementOwned, FillValue};
use zarrs::filesystem::FilesystemStore;

use crate::dataset::{OpenOptions, Variable};
use crate::errors::{Result, ZarrDumpError};

/// Offset-based time encoding parsed from a CF `units` attribute,
/// e.g. `days since 2000-01-01`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeEncoding {
    unit: TimeUnit,
    epoch: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    fn seconds(self) -> f64 {
        match self {
            TimeUnit::Days => 86_400.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Seconds => 1.0,
            TimeUnit::Milliseconds => 1e-3,
        }
    }
}

impl TimeEncoding {
    fn parse(units: &str) -> Option<Self> {
        let (unit, epoch) = units.split_once(" since ")?;
        let unit = match unit.trim() {
            "days" | "day" | "d" => TimeUnit::Days,
            "hours" | "hour" | "hr" | "h" => TimeUnit::Hours,
            "minutes" | "minute" | "min" => TimeUnit::Minutes,
            "seconds" | "second" | "sec" | "s" => TimeUnit::Seconds,
            "milliseconds" | "millisecond" | "ms" => TimeUnit::Milliseconds,
            _ => return None,
        };
        let epoch = parse_epoch(epoch.trim())?;
        Some(Self { unit, epoch })
    }
}

/// Returns the time encoding of `var` if its attributes describe one the
/// datetime renderer supports.
///
/// Requires a parseable CF `units` attribute and a Gregorian-compatible
/// `calendar` (or none); anything else leaves the variable's values raw.
pub fn time_encoding(var: &Variable) -> Option<TimeEncoding> {
    let units = var.attributes().get("units")?.as_str()?;
    let encoding = TimeEncoding::parse(units)?;
    match var.attributes().get("calendar").and_then(Value::as_str) {
        None | Some("standard" | "gregorian" | "proleptic_gregorian") => Some(encoding),
        Some(other) => {
            debug!(
                variable = var.name(),
                calendar = other,
                "unsupported calendar; leaving time values raw"
            );
            None
        }
    }
}

/// Materializes the full contents of `var` and renders them as an array
/// literal.
pub fn format_values(var: &Variable, options: OpenOptions) -> Result<String> {
    if options.decode_times {
        if let Some(encoding) = time_encoding(var) {
            match retrieve_as_f64(var.array())? {
                Some(values) => return Ok(render_datetime_array(&values, &encoding)),
                None => debug!(
                    variable = var.name(),
                    "time units on a non-numeric variable; leaving values raw"
                ),
            }
        }
    }

    let array = var.array();
    match array.data_type() {
        DataType::Bool => render_typed::<bool>(array),
        DataType::Int8 => render_typed::<i8>(array),
        DataType::Int16 => render_typed::<i16>(array),
        DataType::Int32 => render_typed::<i32>(array),
        DataType::Int64 => render_typed::<i64>(array),
        DataType::UInt8 => render_typed::<u8>(array),
        DataType::UInt16 => render_typed::<u16>(array),
        DataType::UInt32 => render_typed::<u32>(array),
        DataType::UInt64 => render_typed::<u64>(array),
        DataType::Float32 => render_typed::<f32>(array),
        DataType::Float64 => render_typed::<f64>(array),
        DataType::String => render_typed::<String>(array),
        _ => render_untyped(array),
    }
}

fn render_typed<T: ElementOwned + std::fmt::Display>(
    array: &Array<FilesystemStore>,
) -> Result<String> {
    let data: ArrayD<T> = array.retrieve_array_subset_ndarray(&array.subset_all())?;
    Ok(format!("{data}"))
}

/// Fallback for element types without a typed retrieval path: fetch raw
/// bytes and render each element through the data type's fill-value
/// metadata formatter.
fn render_untyped(array: &Array<FilesystemStore>) -> Result<String> {
    let dtype = array.data_type();
    let bytes = array.retrieve_array_subset(&array.subset_all())?;
    let elements: Vec<String> = match &bytes {
        ArrayBytes::Fixed(raw) => {
            let element_size = match dtype.fixed_size() {
                Some(size) if size > 0 => size,
                _ => {
                    return Err(ZarrDumpError::UnsupportedDataType {
                        dtype: dtype.name(),
                    })
                }
            };
            raw.chunks_exact(element_size)
                .map(|chunk| format_element(dtype, chunk))
                .collect::<Result<_>>()?
        }
        ArrayBytes::Variable(raw, offsets) => offsets
            .windows(2)
            .map(|bounds| format_element(dtype, &raw[bounds[0]..bounds[1]]))
            .collect::<Result<_>>()?,
    };
    Ok(nest_elements(&elements, array.shape()))
}

fn format_element(dtype: &DataType, bytes: &[u8]) -> Result<String> {
    let fill_value = FillValue::from(bytes);
    let rendered = dtype
        .metadata_fill_value(&fill_value)
        .map_err(|_| ZarrDumpError::UnsupportedDataType {
            dtype: dtype.name(),
        })?;
    Ok(rendered.to_string())
}

/// Wraps flat row-major elements in nested brackets matching `shape`.
fn nest_elements(elements: &[String], shape: &[u64]) -> String {
    match shape {
        [] => elements.first().cloned().unwrap_or_default(),
        [_] => format!("[{}]", elements.join(", ")),
        [outer, rest @ ..] => {
            let inner_len: u64 = rest.iter().product();
            let groups: Vec<String> = (0..*outer)
                .map(|index| {
                    let start = (index * inner_len) as usize;
                    let end = ((index + 1) * inner_len) as usize;
                    nest_elements(&elements[start..end], rest)
                })
                .collect();
            format!("[{}]", groups.join(", "))
        }
    }
}

fn retrieve_as_f64(array: &Array<FilesystemStore>) -> Result<Option<ArrayD<f64>>> {
    let subset = array.subset_all();
    let values = match array.data_type() {
        DataType::Int32 => array
            .retrieve_array_subset_ndarray::<i32>(&subset)?
            .mapv(f64::from),
        DataType::Int64 => array
            .retrieve_array_subset_ndarray::<i64>(&subset)?
            .mapv(|value| value as f64),
        DataType::UInt32 => array
            .retrieve_array_subset_ndarray::<u32>(&subset)?
            .mapv(f64::from),
        DataType::UInt64 => array
            .retrieve_array_subset_ndarray::<u64>(&subset)?
            .mapv(|value| value as f64),
        DataType::Float32 => array
            .retrieve_array_subset_ndarray::<f32>(&subset)?
            .mapv(f64::from),
        DataType::Float64 => array.retrieve_array_subset_ndarray::<f64>(&subset)?,
        _ => return Ok(None),
    };
    Ok(Some(values))
}

fn render_datetime_array(values: &ArrayD<f64>, encoding: &TimeEncoding) -> String {
    let rendered: Vec<String> = values
        .iter()
        .map(|value| render_datetime(*value, encoding))
        .collect();
    let shape: Vec<u64> = values.shape().iter().map(|&extent| extent as u64).collect();
    nest_elements(&rendered, &shape)
}

fn render_datetime(value: f64, encoding: &TimeEncoding) -> String {
    if !value.is_finite() {
        return "NaT".to_string();
    }
    let millis = value * encoding.unit.seconds() * 1000.0;
    Duration::try_milliseconds(millis as i64)
        .and_then(|delta| encoding.epoch.checked_add_signed(delta))
        .map_or_else(
            || "NaT".to_string(),
            |datetime| datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
        )
}

fn parse_epoch(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim_end_matches('Z');
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
