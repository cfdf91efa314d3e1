//! Default input locations.
//!
//! Every input lives under one data directory, taken from the
//! `PARCEL_SCOUT_DATA_DIR` environment variable and falling back to
//! `./data`. Command-line flags override individual files.

use std::path::{Path, PathBuf};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PARCEL_SCOUT_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// The data directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV).map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
}

/// Directory of mobility point CSVs.
#[must_use]
pub fn mobility_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("mobility")
}

/// Directory of establishment point CSVs.
#[must_use]
pub fn establishments_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("establishments")
}

#[must_use]
pub fn parcels_file(data_dir: &Path) -> PathBuf {
    data_dir.join("parcels.geojson")
}

#[must_use]
pub fn market_file(data_dir: &Path) -> PathBuf {
    data_dir.join("market.csv")
}

/// RGI to coordinate lookup table.
#[must_use]
pub fn coordinates_file(data_dir: &Path) -> PathBuf {
    data_dir.join("rgi_coordinates.csv")
}

#[must_use]
pub fn district_stats_file(data_dir: &Path) -> PathBuf {
    data_dir.join("district_stats.csv")
}
