#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Radius queries over categorized point catalogs.
//!
//! Given a set of reference coordinates (usually the centroids of the
//! selected parcels) and a catalog of points, [`find_within_radius`]
//! returns every point whose distance to the *nearest* reference is within
//! the radius, and [`nearest_per_category`] reduces those matches to the
//! closest point of each category.
//!
//! Everything here is a pure function over borrowed, read-only input.
//! Malformed coordinates are excluded from results rather than reported as
//! errors.

pub mod catalog;
pub mod distance;

use std::collections::BTreeMap;

pub use catalog::{DEFAULT_RADIUS_METERS, PointCatalog, ProximityQuery};
pub use distance::{EARTH_RADIUS_METERS, checked_distance, haversine_distance};
pub use parcel_scout_proximity_models::{CatalogPoint, Coordinate, DistanceResult};

/// Closest match per category, keyed by category name.
pub type NearestByCategory = BTreeMap<String, DistanceResult>;

/// Returns every catalog point within `radius_meters` of the nearest
/// reference, tagged with that minimum distance.
///
/// The boundary is inclusive. Points with invalid coordinates and invalid
/// references are skipped. An empty catalog, an empty (or entirely
/// invalid) reference set, or a negative/`NaN` radius yields an empty
/// result. Output preserves catalog order.
#[must_use]
pub fn find_within_radius(
    catalog: &[CatalogPoint],
    references: &[Coordinate],
    radius_meters: f64,
) -> Vec<DistanceResult> {
    if radius_meters.is_nan() || radius_meters < 0.0 {
        log::warn!("Ignoring proximity query with invalid radius {radius_meters}");
        return Vec::new();
    }

    let references: Vec<Coordinate> = references
        .iter()
        .copied()
        .filter(|reference| {
            let valid = reference.is_valid();
            if !valid {
                log::debug!("Skipping invalid reference coordinate {reference}");
            }
            valid
        })
        .collect();

    if catalog.is_empty() || references.is_empty() {
        return Vec::new();
    }

    let mut skipped = 0usize;
    let results: Vec<DistanceResult> = catalog
        .iter()
        .filter_map(|point| {
            let Some(distance) = min_distance(point.coordinate(), &references) else {
                skipped += 1;
                log::trace!(
                    "Excluding {} with invalid coordinates {}",
                    point.identity(),
                    point.coordinate()
                );
                return None;
            };

            (distance <= radius_meters).then(|| DistanceResult {
                point_id: point.identity(),
                category: point.category.clone(),
                distance_meters: distance,
            })
        })
        .collect();

    if skipped > 0 {
        log::debug!("Excluded {skipped} catalog points with invalid coordinates");
    }
    log::debug!(
        "{} of {} catalog points within {radius_meters} m of {} references",
        results.len(),
        catalog.len(),
        references.len()
    );

    results
}

/// Minimum distance from `point` to any of `references`, or `None` if the
/// point is invalid. `references` must already be validated.
fn min_distance(point: Coordinate, references: &[Coordinate]) -> Option<f64> {
    references
        .iter()
        .filter_map(|reference| checked_distance(*reference, point))
        .reduce(f64::min)
}

/// Reduces radius matches to the closest entry of each category.
///
/// Entries are stably sorted by distance and folded so that the first
/// entry seen for a category wins. Ties on distance therefore resolve to
/// whichever entry came first in `results`.
#[must_use]
pub fn nearest_per_category(results: &[DistanceResult]) -> NearestByCategory {
    let mut by_distance: Vec<&DistanceResult> = results.iter().collect();
    by_distance.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));

    by_distance
        .into_iter()
        .fold(NearestByCategory::new(), |mut nearest, result| {
            nearest
                .entry(result.category.clone())
                .or_insert_with(|| result.clone());
            nearest
        })
}

/// Identities of the points within `radius_meters` of a single `center`.
///
/// This is the plain "which records are near this coordinate" lookup used
/// to join coordinate tables against tabular data.
#[must_use]
pub fn ids_within_radius(
    points: &[CatalogPoint],
    center: Coordinate,
    radius_meters: f64,
) -> Vec<String> {
    find_within_radius(points, &[center], radius_meters)
        .into_iter()
        .map(|result| result.point_id)
        .collect()
}
