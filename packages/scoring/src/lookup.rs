//! Points lookup loading.
//!
//! The default lookup is baked into the binary at compile time via
//! [`include_str!`]. A lookup file on disk replaces it entirely.

use std::path::Path;

use parcel_scout_scoring_models::{PointsLookup, PointsPolicy};

use crate::ScoringError;

/// Default lookup embedded at compile time.
const DEFAULT_LOOKUP_TOML: &str = include_str!("../lookups/default.toml");

/// Returns the embedded default lookup.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a compile-time guarantee
/// covered by tests).
#[must_use]
pub fn default_lookup() -> PointsLookup {
    parse_lookup(DEFAULT_LOOKUP_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded default.toml: {e}"))
}

/// Parses and validates a lookup from TOML text.
///
/// # Errors
///
/// Returns [`ScoringError::Toml`] if the text is not a valid lookup, or
/// [`ScoringError::InvalidPolicy`] if a policy fails validation.
pub fn parse_lookup(toml_str: &str) -> Result<PointsLookup, ScoringError> {
    let lookup: PointsLookup = toml::from_str(toml_str)?;

    for (category, policy) in &lookup.categories {
        validate_policy(category, policy)?;
    }

    Ok(lookup)
}

/// Reads a lookup file from disk.
///
/// # Errors
///
/// Returns [`ScoringError::Io`] if the file cannot be read, otherwise the
/// same errors as [`parse_lookup`].
pub fn load_lookup(path: &Path) -> Result<PointsLookup, ScoringError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ScoringError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let lookup = parse_lookup(&contents)?;
    log::info!(
        "Loaded {} category policies from {}",
        lookup.categories.len(),
        path.display()
    );

    Ok(lookup)
}

fn validate_policy(category: &str, policy: &PointsPolicy) -> Result<(), ScoringError> {
    let invalid = |message: &str| ScoringError::InvalidPolicy {
        category: category.to_string(),
        message: message.to_string(),
    };

    match policy {
        PointsPolicy::Flat { points } => {
            if !points.is_finite() || *points < 0.0 {
                return Err(invalid("points must be a non-negative number"));
            }
        }
        PointsPolicy::Bands { bands } => {
            if bands.is_empty() {
                return Err(invalid("at least one band is required"));
            }
            for band in bands {
                if !band.points.is_finite() || band.points < 0.0 {
                    return Err(invalid("band points must be non-negative"));
                }
                if band.max_distance_meters.is_nan() || band.max_distance_meters < 0.0 {
                    return Err(invalid("band max_distance_meters must be non-negative"));
                }
            }
        }
        PointsPolicy::LinearDecay {
            max_points,
            zero_at_meters,
        } => {
            if !max_points.is_finite() || *max_points < 0.0 {
                return Err(invalid("max_points must be non-negative"));
            }
            if !zero_at_meters.is_finite() || *zero_at_meters <= 0.0 {
                return Err(invalid("zero_at_meters must be positive"));
            }
        }
    }

    Ok(())
}
