#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Score table entries and category points policies.
//!
//! A [`PointsLookup`] maps each category label to a [`PointsPolicy`]
//! describing how many points the nearest point of that category is worth
//! at a given distance. The scoring crate evaluates the lookup against
//! nearest-per-category results and produces a [`ScoreTable`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which catalog a score entry came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreSource {
    /// Mobility infrastructure (stations, stops, lines).
    Mobility,
    /// Establishments (commerce, schools, health, street markets).
    Establishment,
}

/// One row of the score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Category label.
    pub category: String,
    /// Catalog the category was found in.
    pub source: ScoreSource,
    /// Distance to the nearest point of this category, in meters.
    pub distance_meters: f64,
    /// Points awarded.
    pub points: f64,
    /// `false` when the category has no entry in the lookup (scored 0).
    pub in_lookup: bool,
}

/// Score rows ordered by category, plus their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTable {
    /// Rows ordered by category name, then source.
    pub entries: Vec<ScoreEntry>,
    /// Sum of [`ScoreEntry::points`].
    pub total_score: f64,
}

impl ScoreTable {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories that were scored 0 because the lookup has no entry.
    #[must_use]
    pub fn unmatched_categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.in_lookup)
            .map(|e| e.category.as_str())
            .collect()
    }
}

/// A distance band: `points` apply up to and including
/// `max_distance_meters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceBand {
    pub max_distance_meters: f64,
    pub points: f64,
}

/// How a category's points depend on distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PointsPolicy {
    /// Same points at any distance.
    Flat {
        /// Points awarded.
        points: f64,
    },
    /// Points of the first band (ascending by bound) that covers the
    /// distance; 0 beyond the last band.
    Bands {
        /// The bands, in any order.
        bands: Vec<DistanceBand>,
    },
    /// `max_points` at distance 0, decreasing linearly to 0 at
    /// `zero_at_meters`.
    LinearDecay {
        /// Points at distance 0.
        max_points: f64,
        /// Distance at which the points reach 0.
        zero_at_meters: f64,
    },
}

impl PointsPolicy {
    /// Points for a match at `distance_meters`. Non-finite or negative
    /// distances score 0.
    #[must_use]
    pub fn points_at(&self, distance_meters: f64) -> f64 {
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return 0.0;
        }

        match self {
            Self::Flat { points } => *points,
            Self::Bands { bands } => bands
                .iter()
                .filter(|band| distance_meters <= band.max_distance_meters)
                .min_by(|a, b| a.max_distance_meters.total_cmp(&b.max_distance_meters))
                .map_or(0.0, |band| band.points),
            Self::LinearDecay {
                max_points,
                zero_at_meters,
            } => {
                if *zero_at_meters <= 0.0 {
                    return 0.0;
                }
                (max_points * (1.0 - distance_meters / zero_at_meters)).max(0.0)
            }
        }
    }

    /// Highest points this policy can award.
    #[must_use]
    pub fn max_points(&self) -> f64 {
        match self {
            Self::Flat { points } => *points,
            Self::Bands { bands } => bands.iter().map(|b| b.points).fold(0.0, f64::max),
            Self::LinearDecay { max_points, .. } => *max_points,
        }
    }
}

/// Category label to points policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsLookup {
    #[serde(default)]
    pub categories: BTreeMap<String, PointsPolicy>,
}

impl PointsLookup {
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&PointsPolicy> {
        self.categories.get(category)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
