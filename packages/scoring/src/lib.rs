#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Score tables for selected parcels.
//!
//! Takes the nearest point of each mobility and establishment category
//! around a parcel selection and turns it into a points table using a
//! [`PointsLookup`]. Categories the lookup does not know about score 0
//! and are flagged instead of failing the whole table.

pub mod lookup;

use parcel_scout_proximity::{NearestByCategory, PointCatalog};
use parcel_scout_proximity_models::Coordinate;
use thiserror::Error;

pub use lookup::{default_lookup, load_lookup, parse_lookup};
pub use parcel_scout_scoring_models::{
    DistanceBand, PointsLookup, PointsPolicy, ScoreEntry, ScoreSource, ScoreTable,
};

/// Errors that can occur while loading a points lookup.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Lookup file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path to the lookup file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Lookup is not valid TOML or does not match the expected shape.
    #[error("Invalid lookup TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A category policy has out-of-range values.
    #[error("Invalid policy for category '{category}': {message}")]
    InvalidPolicy {
        /// Category whose policy is invalid.
        category: String,
        /// Description of what went wrong.
        message: String,
    },
}

/// Builds the score table for the nearest mobility and establishment
/// matches.
///
/// Produces one entry per category per source, ordered by category name
/// and then source. Categories missing from `lookup` contribute 0 points
/// with `in_lookup = false`.
#[must_use]
pub fn build_score_table(
    nearest_mobility: &NearestByCategory,
    nearest_establishments: &NearestByCategory,
    lookup: &PointsLookup,
) -> ScoreTable {
    let mut entries: Vec<ScoreEntry> = [
        (ScoreSource::Mobility, nearest_mobility),
        (ScoreSource::Establishment, nearest_establishments),
    ]
    .into_iter()
    .flat_map(|(source, nearest)| {
        nearest
            .values()
            .map(move |result| {
                score_entry(source, &result.category, result.distance_meters, lookup)
            })
    })
    .collect();

    entries.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.source.cmp(&b.source))
    });

    let total_score = entries.iter().map(|e| e.points).sum();

    ScoreTable {
        entries,
        total_score,
    }
}

fn score_entry(
    source: ScoreSource,
    category: &str,
    distance_meters: f64,
    lookup: &PointsLookup,
) -> ScoreEntry {
    let (points, in_lookup) = lookup.get(category).map_or_else(
        || {
            log::debug!("No points policy for {source} category '{category}', scoring 0");
            (0.0, false)
        },
        |policy| (policy.points_at(distance_meters), true),
    );

    ScoreEntry {
        category: category.to_string(),
        source,
        distance_meters,
        points,
        in_lookup,
    }
}

/// Runs the full scoring pipeline for a reference set: radius query on
/// both catalogs, nearest-per-category reduction, then
/// [`build_score_table`].
#[must_use]
pub fn score_selection(
    mobility: &PointCatalog,
    establishments: &PointCatalog,
    references: &[Coordinate],
    radius_meters: f64,
    lookup: &PointsLookup,
) -> ScoreTable {
    let nearest_mobility = mobility.nearest_within_radius(references, radius_meters);
    let nearest_establishments = establishments.nearest_within_radius(references, radius_meters);

    let table = build_score_table(&nearest_mobility, &nearest_establishments, lookup);
    log::info!(
        "Scored {} categories for {} reference points: total {:.2}",
        table.entries.len(),
        references.len(),
        table.total_score
    );

    table
}

#[cfg(test)]
mod tests {
    use parcel_scout_proximity::{CatalogPoint, DistanceResult};

    use super::*;

    fn nearest(rows: &[(&str, f64)]) -> NearestByCategory {
        rows.iter()
            .map(|(category, distance)| {
                (
                    (*category).to_string(),
                    DistanceResult {
                        point_id: format!("{category}-1"),
                        category: (*category).to_string(),
                        distance_meters: *distance,
                    },
                )
            })
            .collect()
    }

    fn lookup() -> PointsLookup {
        parse_lookup(
            r#"
            [categories."Estacao de Metro"]
            policy = "bands"
            bands = [
              { max_distance_meters = 500.0, points = 10.0 },
              { max_distance_meters = 1000.0, points = 5.0 },
            ]

            [categories.Escola]
            policy = "flat"
            points = 2.0

            [categories."Shopping Center"]
            policy = "linear_decay"
            max_points = 6.0
            zero_at_meters = 2000.0
            "#,
        )
        .unwrap()
    }

    #[test]
    fn empty_mappings_give_empty_table() {
        let table = build_score_table(&nearest(&[]), &nearest(&[]), &lookup());
        assert!(table.is_empty());
        assert!(table.total_score.abs() < f64::EPSILON);
    }

    #[test]
    fn sums_points_across_sources() {
        let table = build_score_table(
            &nearest(&[("Estacao de Metro", 300.0)]),
            &nearest(&[("Escola", 50.0), ("Shopping Center", 1_000.0)]),
            &lookup(),
        );

        assert_eq!(table.entries.len(), 3);
        assert!((table.total_score - 15.0).abs() < 1e-9);
    }

    #[test]
    fn missing_category_scores_zero_and_is_flagged() {
        let table = build_score_table(
            &nearest(&[("Heliponto", 100.0), ("Estacao de Metro", 800.0)]),
            &nearest(&[]),
            &lookup(),
        );

        let heliponto = table
            .entries
            .iter()
            .find(|e| e.category == "Heliponto")
            .unwrap();
        assert!(heliponto.points.abs() < f64::EPSILON);
        assert!(!heliponto.in_lookup);
        assert!((table.total_score - 5.0).abs() < f64::EPSILON);
        assert_eq!(table.unmatched_categories(), vec!["Heliponto"]);
    }

    #[test]
    fn entries_are_ordered_by_category_then_source() {
        let table = build_score_table(
            &nearest(&[("Zoologico", 10.0), ("Escola", 10.0)]),
            &nearest(&[("Escola", 20.0), ("Academia", 10.0)]),
            &lookup(),
        );

        let order: Vec<(&str, ScoreSource)> = table
            .entries
            .iter()
            .map(|e| (e.category.as_str(), e.source))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Academia", ScoreSource::Establishment),
                ("Escola", ScoreSource::Mobility),
                ("Escola", ScoreSource::Establishment),
                ("Zoologico", ScoreSource::Mobility),
            ]
        );
    }

    #[test]
    fn empty_lookup_scores_everything_zero() {
        let table = build_score_table(
            &nearest(&[("Estacao de Metro", 10.0)]),
            &nearest(&[("Escola", 10.0)]),
            &PointsLookup::default(),
        );
        assert_eq!(table.entries.len(), 2);
        assert!(table.total_score.abs() < f64::EPSILON);
    }

    #[test]
    fn score_selection_runs_full_pipeline() {
        let reference = Coordinate::new(-23.55028, -46.63389);
        let mobility = PointCatalog::new(vec![
            CatalogPoint::new("Estacao de Metro", -23.55028, -46.63389).with_id("se"),
            CatalogPoint::new("Estacao de Metro", -23.5600, -46.6400).with_id("other"),
        ]);
        let establishments = PointCatalog::new(vec![
            CatalogPoint::new("Escola", -23.5510, -46.6345).with_id("escola-1"),
            CatalogPoint::new("Escola", 200.0, -46.6345).with_id("broken"),
        ]);

        let table = score_selection(&mobility, &establishments, &[reference], 2_000.0, &lookup());

        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].category, "Escola");
        assert_eq!(table.entries[1].category, "Estacao de Metro");
        assert!(table.entries[1].distance_meters.abs() < f64::EPSILON);
        assert!((table.total_score - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_selection_with_no_references_is_empty() {
        let mobility = PointCatalog::new(vec![CatalogPoint::new("Estacao de Metro", -23.5, -46.6)]);
        let table = score_selection(&mobility, &PointCatalog::default(), &[], 2_000.0, &lookup());
        assert!(table.is_empty());
    }
}
