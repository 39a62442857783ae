//! Tests for full-array value rendering: typed literals, the raw-bytes
//! fallback, and CF time decoding.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tempfile::tempdir;
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs::filesystem::FilesystemStore;

use zarrdump::dataset::{Dataset, OpenOptions};
use zarrdump::values::{format_values, time_encoding};

fn new_store(root: &Path) -> (PathBuf, Arc<FilesystemStore>) {
    let store_path = root.join("data.zarr");
    let store = Arc::new(FilesystemStore::new(&store_path).expect("Failed to create store"));
    (store_path, store)
}

fn attrs_with(key: &str, value: Value) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert(key.to_string(), value);
    attrs
}

/// Builds a one-dimensional float64 array carrying a CF units attribute.
fn build_time_array(store: &Arc<FilesystemStore>, node: &str, units: &str, values: &[f64]) {
    let len = values.len() as u64;
    let array = ArrayBuilder::new(
        vec![len],
        DataType::Float64,
        vec![len].try_into().expect("Invalid chunk shape"),
        FillValue::from(0.0f64),
    )
    .attributes(attrs_with("units", units.into()))
    .build(store.clone(), node)
    .expect("Failed to build time array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![len]), values)
        .expect("Failed to write time values");
}

fn dump(store_path: &Path, name: &str, options: OpenOptions) -> String {
    let dataset = Dataset::open(store_path, options).expect("Failed to open dataset");
    let var = dataset.variable(name).expect("Variable missing from dataset");
    format_values(var, dataset.options()).expect("Failed to render values")
}

fn decode_times() -> OpenOptions {
    OpenOptions {
        decode_times: true,
        decode_coords: false,
    }
}

#[test]
fn test_int64_matrix_renders_nested_rows() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![2, 2],
        DataType::Int64,
        vec![2, 2].try_into().expect("Invalid chunk shape"),
        FillValue::from(0i64),
    )
    .build(store.clone(), "/m")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![2, 2]), &[1i64, 2, 3, 4])
        .expect("Failed to write values");

    assert_eq!(
        dump(&store_path, "m", OpenOptions::raw()),
        "[[1, 2],\n [3, 4]]"
    );
}

#[test]
fn test_float64_values_keep_fractions() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![3],
        DataType::Float64,
        vec![3].try_into().expect("Invalid chunk shape"),
        FillValue::from(0.0f64),
    )
    .build(store.clone(), "/x")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![3]), &[0.5f64, 1.5, 2.5])
        .expect("Failed to write values");

    assert_eq!(dump(&store_path, "x", OpenOptions::raw()), "[0.5, 1.5, 2.5]");
}

#[test]
fn test_bool_values_render_as_keywords() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![3],
        DataType::Bool,
        vec![3].try_into().expect("Invalid chunk shape"),
        FillValue::from(false),
    )
    .build(store.clone(), "/flags")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![3]), &[true, false, true])
        .expect("Failed to write values");

    assert_eq!(
        dump(&store_path, "flags", OpenOptions::raw()),
        "[true, false, true]"
    );
}

#[test]
fn test_uint8_values_render_unsigned() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![3],
        DataType::UInt8,
        vec![3].try_into().expect("Invalid chunk shape"),
        FillValue::from(0u8),
    )
    .build(store.clone(), "/levels")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![3]), &[0u8, 128, 255])
        .expect("Failed to write values");

    assert_eq!(
        dump(&store_path, "levels", OpenOptions::raw()),
        "[0, 128, 255]"
    );
}

#[test]
fn test_scalar_renders_bare_value() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![],
        DataType::Float32,
        Vec::<u64>::new().try_into().expect("Invalid chunk shape"),
        FillValue::from(0.0f32),
    )
    .build(store.clone(), "/s")
    .expect("Failed to build scalar");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![]), &[42.5f32])
        .expect("Failed to write scalar value");

    assert_eq!(dump(&store_path, "s", OpenOptions::raw()), "42.5");
}

#[test]
fn test_raw_bits_fall_back_to_byte_groups() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![2],
        DataType::RawBits(2),
        vec![2].try_into().expect("Invalid chunk shape"),
        FillValue::new(vec![0, 0]),
    )
    .build(store.clone(), "/raw")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(
            &ArraySubset::new_with_shape(vec![2]),
            &[[1u8, 2], [3u8, 4]],
        )
        .expect("Failed to write values");

    assert_eq!(
        dump(&store_path, "raw", OpenOptions::raw()),
        "[[1,2], [3,4]]"
    );
}

#[test]
fn test_decode_times_renders_day_offsets() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    build_time_array(&store, "/time", "days since 2000-01-01", &[0.0, 1.5]);

    assert_eq!(
        dump(&store_path, "time", decode_times()),
        "[2000-01-01T00:00:00, 2000-01-02T12:00:00]"
    );
    assert_eq!(dump(&store_path, "time", OpenOptions::raw()), "[0, 1.5]");
}

#[test]
fn test_decode_times_honours_epoch_time_of_day() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    build_time_array(&store, "/time", "hours since 2000-01-01 06:00:00", &[1.5]);

    assert_eq!(
        dump(&store_path, "time", decode_times()),
        "[2000-01-01T07:30:00]"
    );
}

#[test]
fn test_decode_times_parses_iso_epoch_with_zulu_suffix() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    build_time_array(&store, "/time", "seconds since 1970-01-01T00:00:00Z", &[86400.0]);

    assert_eq!(
        dump(&store_path, "time", decode_times()),
        "[1970-01-02T00:00:00]"
    );
}

#[test]
fn test_decode_times_parses_minute_epochs() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    build_time_array(&store, "/time", "minutes since 2000-01-01 12:30", &[30.0]);

    assert_eq!(
        dump(&store_path, "time", decode_times()),
        "[2000-01-01T13:00:00]"
    );
}

#[test]
fn test_non_finite_times_render_nat() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    build_time_array(&store, "/time", "seconds since 1970-01-01", &[0.0, f64::NAN]);

    assert_eq!(
        dump(&store_path, "time", decode_times()),
        "[1970-01-01T00:00:00, NaT]"
    );
}

#[test]
fn test_integer_time_values_decode() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![2],
        DataType::Int32,
        vec![2].try_into().expect("Invalid chunk shape"),
        FillValue::from(0i32),
    )
    .attributes(attrs_with("units", "days since 2000-01-01".into()))
    .build(store.clone(), "/time")
    .expect("Failed to build time array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![2]), &[0i32, 1])
        .expect("Failed to write values");

    assert_eq!(
        dump(&store_path, "time", decode_times()),
        "[2000-01-01T00:00:00, 2000-01-02T00:00:00]"
    );
}

#[test]
fn test_unsupported_calendar_leaves_values_raw() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let mut attrs = attrs_with("units", "days since 2000-01-01".into());
    attrs.insert("calendar".to_string(), "360_day".into());
    let array = ArrayBuilder::new(
        vec![2],
        DataType::Float64,
        vec![2].try_into().expect("Invalid chunk shape"),
        FillValue::from(0.0f64),
    )
    .attributes(attrs)
    .build(store.clone(), "/time")
    .expect("Failed to build time array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![2]), &[0.0f64, 1.0])
        .expect("Failed to write values");

    let dataset = Dataset::open(&store_path, decode_times()).expect("Failed to open dataset");
    let var = dataset.variable("time").expect("Variable missing");
    assert!(time_encoding(var).is_none());
    assert_eq!(dump(&store_path, "time", decode_times()), "[0, 1]");
}

#[test]
fn test_plain_units_are_not_time_encodings() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![2],
        DataType::Float64,
        vec![2].try_into().expect("Invalid chunk shape"),
        FillValue::from(0.0f64),
    )
    .attributes(attrs_with("units", "K".into()))
    .build(store.clone(), "/temp")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![2]), &[250.5f64, 251.0])
        .expect("Failed to write values");

    let dataset = Dataset::open(&store_path, decode_times()).expect("Failed to open dataset");
    let var = dataset.variable("temp").expect("Variable missing");
    assert!(time_encoding(var).is_none());
    assert_eq!(dump(&store_path, "temp", decode_times()), "[250.5, 251]");
}

#[test]
fn test_time_units_on_non_numeric_variable_stay_raw() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let (store_path, store) = new_store(temp_dir.path());
    let array = ArrayBuilder::new(
        vec![2],
        DataType::Bool,
        vec![2].try_into().expect("Invalid chunk shape"),
        FillValue::from(false),
    )
    .attributes(attrs_with("units", "days since 2000-01-01".into()))
    .build(store.clone(), "/odd")
    .expect("Failed to build array");
    array.store_metadata().expect("Failed to store metadata");
    array
        .store_array_subset_elements(&ArraySubset::new_with_shape(vec![2]), &[true, false])
        .expect("Failed to write values");

    assert_eq!(dump(&store_path, "odd", decode_times()), "[true, false]");
}
