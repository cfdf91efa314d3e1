#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, catalog point, and distance result types.
//!
//! A catalog is a read-only sequence of [`CatalogPoint`] values (mobility
//! features, establishments, or any other categorized point). Queries take
//! a set of reference [`Coordinate`]s and produce [`DistanceResult`] rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees, valid range `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, valid range `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating it.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Error returned when a `"lat,lon"` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordinateError {
    /// The input that failed to parse.
    pub input: String,
}

impl std::fmt::Display for ParseCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinate '{}': expected LAT,LON in decimal degrees",
            self.input
        )
    }
}

impl std::error::Error for ParseCoordinateError {}

impl std::str::FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError {
            input: s.to_string(),
        };

        let (lat, lon) = s.split_once(',').ok_or_else(err)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| err())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| err())?;

        Ok(Self::new(latitude, longitude))
    }
}

/// A categorized point of interest loaded from a catalog.
///
/// Immutable once loaded. Identity is [`CatalogPoint::identity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPoint {
    /// Source identifier, if the catalog supplies one.
    pub id: Option<String>,
    /// Category label (the `Tipo` column, e.g. `"Estacao de Metro"`).
    pub category: String,
    /// Latitude in degrees. May be out of range or `NaN` for bad rows.
    pub latitude: f64,
    /// Longitude in degrees. May be out of range or `NaN` for bad rows.
    pub longitude: f64,
    /// Remaining columns from the source row.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl CatalogPoint {
    /// Creates a point with no id and no attributes.
    #[must_use]
    pub fn new(category: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: None,
            category: category.into(),
            latitude,
            longitude,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the point's id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The point's location.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// The point's id, or `category@lat,lon` when the catalog has none.
    #[must_use]
    pub fn identity(&self) -> String {
        self.id.as_ref().map_or_else(
            || format!("{}@{},{}", self.category, self.latitude, self.longitude),
            Clone::clone,
        )
    }
}

/// Distance from the reference set to a single catalog point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResult {
    /// [`CatalogPoint::identity`] of the matched point.
    pub point_id: String,
    /// Category of the matched point.
    pub category: String,
    /// Great-circle distance in meters to the nearest reference.
    pub distance_meters: f64,
}
