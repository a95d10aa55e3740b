//! Row normalization for data-package resources.
//!
//! Takes a resource schema plus its source dataset and produces clean
//! JSON row records: source columns renamed to schema names, cells
//! coerced to the schema types, identifier columns zero-padded, and
//! shapefile geometry carried along as GeoJSON text.

pub mod coerce;
pub mod error;
pub mod loader;

pub use coerce::{coerce_value, is_sentinel, zero_fill};
pub use error::TransformError;
pub use loader::{GEOMETRY_FIELD, LoadReport, RowError, load_rows, normalize_table};
