#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input loaders for the parcel scout toolchain.
//!
//! Reads the files the analysis runs on into the core types:
//!
//! * point catalogs (mobility features, establishments) from CSV
//! * parcel polygons from `GeoJSON`
//! * market, RGI coordinate, and district demographic tables from CSV
//!
//! Loading is the only fallible step. Rows that cannot be interpreted are
//! skipped with a `trace` log line rather than failing the whole file, and
//! coordinates that do not parse are kept as `NaN` so the proximity
//! queries exclude them.

pub mod parcels;
pub mod paths;
pub mod points;
pub mod progress;
pub mod tables;

use thiserror::Error;

pub use parcels::{
    Parcel, ParcelSelection, districts_of, load_parcels_geojson, reference_points, select_parcels,
};
pub use points::{load_points, load_points_csv, load_points_dir};
pub use tables::{load_coordinates_csv, load_district_stats_csv, load_market_csv};

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O error reading a file or directory.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// CSV header could not be read.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Path to the CSV file.
        path: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// File is not valid `GeoJSON`.
    #[error("GeoJSON error in {path}: {source}")]
    GeoJson {
        /// Path to the `GeoJSON` file.
        path: String,
        /// Underlying `GeoJSON` error.
        source: Box<geojson::Error>,
    },

    /// `GeoJSON` document holds a bare geometry instead of features.
    #[error("{0} does not contain features")]
    NotFeatureCollection(String),

    /// A required column is absent from the header row.
    #[error("{path} is missing required column '{column}'")]
    MissingColumn {
        /// Path to the CSV file.
        path: String,
        /// Name of the missing column.
        column: String,
    },

    /// Input path does not exist.
    #[error("Path not found: {0}")]
    NotFound(String),
}

/// Index of the first header matching any of `names`, ignoring
/// surrounding whitespace.
pub(crate) fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
}

/// Like [`column_index`], but a missing column is an error.
pub(crate) fn required_column(
    headers: &csv::StringRecord,
    name: &str,
    path: &str,
) -> Result<usize, CatalogError> {
    column_index(headers, &[name]).ok_or_else(|| CatalogError::MissingColumn {
        path: path.to_string(),
        column: name.to_string(),
    })
}

/// Trimmed, non-empty field at `index`.
pub(crate) fn field(record: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_index_matches_any_alias() {
        let headers = csv::StringRecord::from(vec!["Tipo", " ID ", "Latitude"]);
        assert_eq!(column_index(&headers, &["id", "ID"]), Some(1));
        assert_eq!(column_index(&headers, &["Longitude"]), None);
    }

    #[test]
    fn required_column_reports_path_and_name() {
        let headers = csv::StringRecord::from(vec!["Tipo"]);
        let err = required_column(&headers, "Latitude", "points.csv").unwrap_err();
        assert_eq!(
            err.to_string(),
            "points.csv is missing required column 'Latitude'"
        );
    }

    #[test]
    fn field_skips_blank_values() {
        let record = csv::StringRecord::from(vec!["  a ", "   "]);
        assert_eq!(field(&record, Some(0)), Some("a"));
        assert_eq!(field(&record, Some(1)), None);
        assert_eq!(field(&record, Some(5)), None);
        assert_eq!(field(&record, None), None);
    }
}
