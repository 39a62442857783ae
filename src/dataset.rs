//! Dataset adapter over the `zarrs` store reader.
//!
//! This module is the only place that touches `zarrs` store and group types
//! directly. A [`Dataset`] indexes the root-level arrays of a Zarr V2 or V3
//! store as named [`Variable`]s, mirroring the single-group dataset model of
//! common scientific tooling. Dropping the dataset releases the store on
//! every exit path.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use zarrs::array::{Array, ArrayCreateError};
use zarrs::filesystem::FilesystemStore;
use zarrs::group::Group;
use zarrs::node::{meta_key_v2_group, meta_key_v3, NodePath};
use zarrs::storage::{discover_children, ReadableStorageTraits, StorePrefix};

use crate::errors::Result;

/// Decoding switches mirroring the options of the underlying reader.
///
/// The defaults match the reader's own (both enabled); the CLI always opens
/// with [`OpenOptions::raw`] so that stored values pass through unmodified.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    /// Render variables with CF-style time units as calendar datetimes.
    pub decode_times: bool,
    /// List variables named in `coordinates` attributes under Coordinates.
    pub decode_coords: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            decode_times: true,
            decode_coords: true,
        }
    }
}

impl OpenOptions {
    /// Both decode switches disabled: summaries and dumps show raw stored values.
    pub fn raw() -> Self {
        Self {
            decode_times: false,
            decode_coords: false,
        }
    }
}

/// A named array of an open dataset, with its resolved dimension names.
pub struct Variable {
    name: String,
    dimensions: Vec<String>,
    array: Array<FilesystemStore>,
}

impl Variable {
    /// Variable name (the array's store key below the root group).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension names, one per axis.
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Array shape, one extent per axis.
    pub fn shape(&self) -> &[u64] {
        self.array.shape()
    }

    /// True for zero-dimensional arrays.
    pub fn is_scalar(&self) -> bool {
        self.array.shape().is_empty()
    }

    /// Name of the element data type, e.g. `float32`.
    pub fn dtype_name(&self) -> String {
        self.array.data_type().name()
    }

    /// The variable's attributes in stored order.
    pub fn attributes(&self) -> &Map<String, Value> {
        self.array.attributes()
    }

    pub(crate) fn array(&self) -> &Array<FilesystemStore> {
        &self.array
    }
}

/// An open dataset: root-group attributes plus the root-level arrays of a
/// Zarr store, sorted by name.
pub struct Dataset {
    path: PathBuf,
    options: OpenOptions,
    attributes: Map<String, Value>,
    variables: Vec<Variable>,
}

impl Dataset {
    /// Opens the store at `path` and indexes its root-level arrays.
    ///
    /// Children that are subgroups or carry no node metadata are skipped;
    /// a store that is malformed in any other way fails with the reader's
    /// own error, untranslated.
    pub fn open(path: &Path, options: OpenOptions) -> Result<Self> {
        let store = Arc::new(FilesystemStore::new(path)?);
        debug!(store = %path.display(), "opened filesystem store");

        // Root group metadata is optional: a bare directory of arrays still
        // dumps, it just has no global attributes.
        let root = NodePath::root();
        let has_root_metadata = store.get(&meta_key_v3(&root))?.is_some()
            || store.get(&meta_key_v2_group(&root))?.is_some();
        let attributes = if has_root_metadata {
            Group::open(store.clone(), "/")?.attributes().clone()
        } else {
            debug!("no root group metadata; global attributes are empty");
            Map::new()
        };

        let mut variables = Vec::new();
        for child in discover_children(&store, &StorePrefix::root())? {
            let name = child.as_str().trim_end_matches('/').to_string();
            let node_path = format!("/{name}");
            match Array::open(store.clone(), &node_path) {
                Ok(array) => {
                    let dimensions = resolve_dimension_names(&array);
                    variables.push(Variable {
                        name,
                        dimensions,
                        array,
                    });
                }
                Err(ArrayCreateError::MissingMetadata) => {
                    debug!(child = %name, "skipping child without node metadata");
                }
                Err(err) => {
                    // Subgroups carry metadata that parses as a group but
                    // not as an array.
                    if Group::open(store.clone(), &node_path).is_ok() {
                        debug!(child = %name, "skipping subgroup");
                    } else {
                        return Err(err.into());
                    }
                }
            }
        }
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(variables = variables.len(), "dataset indexed");

        Ok(Self {
            path: path.to_path_buf(),
            options,
            attributes,
            variables,
        })
    }

    /// The path the dataset was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decode switches the dataset was opened with.
    pub fn options(&self) -> OpenOptions {
        self.options
    }

    /// Root-group attributes in stored order.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// All variables, sorted by name.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Looks up a variable by exact name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name == name)
    }

    /// Dimension names with their sizes, aggregated over all variables.
    ///
    /// The first variable to use a name fixes its size; a conflicting size
    /// on a later variable is logged and ignored.
    pub fn dimensions(&self) -> BTreeMap<String, u64> {
        let mut dims = BTreeMap::new();
        for var in &self.variables {
            for (name, size) in var.dimensions.iter().zip(var.shape()) {
                match dims.entry(name.clone()) {
                    Entry::Vacant(entry) => {
                        entry.insert(*size);
                    }
                    Entry::Occupied(entry) => {
                        if *entry.get() != *size {
                            debug!(dimension = %name, "conflicting dimension sizes across variables");
                        }
                    }
                }
            }
        }
        dims
    }

    /// Names of the variables that list under Coordinates in the summary.
    ///
    /// A variable named after one of its own dimensions is always a
    /// coordinate. With `decode_coords` enabled, variables referenced by
    /// other variables' `coordinates` attributes are promoted as well.
    pub fn coordinate_names(&self) -> BTreeSet<String> {
        let mut coords = BTreeSet::new();
        for var in &self.variables {
            if var.dimensions.contains(&var.name) {
                coords.insert(var.name.clone());
            }
            if self.options.decode_coords {
                if let Some(Value::String(list)) = var.attributes().get("coordinates") {
                    for name in list.split_whitespace() {
                        if self.variable(name).is_some() {
                            coords.insert(name.to_string());
                        }
                    }
                }
            }
        }
        coords
    }
}

/// Resolves per-axis dimension names for an array.
///
/// Preference order: explicit `dimension_names` in the array metadata
/// (Zarr V3), the `_ARRAY_DIMENSIONS` attribute (the V2 convention written
/// by common dataset writers), then positional `dim_N` fallbacks.
fn resolve_dimension_names(array: &Array<FilesystemStore>) -> Vec<String> {
    if let Some(names) = array.dimension_names() {
        return names
            .iter()
            .enumerate()
            .map(|(axis, name)| name.clone().unwrap_or_else(|| format!("dim_{axis}")))
            .collect();
    }
    if let Some(Value::Array(names)) = array.attributes().get("_ARRAY_DIMENSIONS") {
        let named: Vec<String> = names
            .iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect();
        if named.len() == array.shape().len() {
            return named;
        }
    }
    (0..array.shape().len())
        .map(|axis| format!("dim_{axis}"))
        .collect()
}
