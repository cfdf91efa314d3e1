#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region membership and demographic filters for city districts.
//!
//! Narrows the districts that contain candidate parcels down to the ones
//! worth looking at, by region and by income, population, and density.

pub mod filter;
pub mod normalize;
pub mod regions;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

pub use filter::{DistrictFilter, DistrictStats, filter_districts, index_stats};
pub use normalize::normalize_district_name;
pub use regions::RegionTable;

/// City region.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Region {
    Centro,
    Norte,
    Sul,
    Leste,
    Oeste,
}

impl Region {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Centro,
            Self::Norte,
            Self::Sul,
            Self::Leste,
            Self::Oeste,
        ]
    }
}

/// Errors that can occur while loading a region table.
#[derive(Debug, Error)]
pub enum DistrictError {
    /// Region table could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path to the region table.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Region table is not valid TOML.
    #[error("Invalid region table: {0}")]
    Toml(#[from] toml::de::Error),

    /// Region table names a region that does not exist.
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_display_and_parse() {
        assert_eq!(Region::Centro.to_string(), "CENTRO");
        assert_eq!("oeste".parse::<Region>().unwrap(), Region::Oeste);
        assert_eq!("LESTE".parse::<Region>().unwrap(), Region::Leste);
        assert!("nordeste".parse::<Region>().is_err());
    }

    #[test]
    fn all_regions() {
        assert_eq!(Region::all().len(), 5);
    }
}
