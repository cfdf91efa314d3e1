//! Region and demographic filter chain.
//!
//! Candidate districts are narrowed in a fixed order: region, then mean
//! income, then population, then density. Each numeric stage only runs
//! while at least two candidates remain, since a single district leaves
//! nothing to compare.

use std::collections::{BTreeMap, BTreeSet};

use parcel_scout_market_models::Range;
use serde::{Deserialize, Serialize};

use crate::{Region, RegionTable, normalize_district_name};

/// Demographic figures for a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStats {
    /// Normalized district name.
    pub name: String,
    pub mean_income: Option<f64>,
    pub population: Option<u64>,
    /// Residents per square kilometer.
    pub density: Option<f64>,
}

/// Criteria for [`filter_districts`]. Unbounded ranges are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictFilter {
    /// Regions to keep. Empty keeps every region.
    pub regions: Vec<Region>,
    pub mean_income: Range<f64>,
    pub population: Range<u64>,
    pub density: Range<f64>,
}

/// Indexes stats by normalized district name.
#[must_use]
pub fn index_stats(stats: &[DistrictStats]) -> BTreeMap<String, DistrictStats> {
    stats
        .iter()
        .map(|s| (normalize_district_name(&s.name), s.clone()))
        .collect()
}

/// Narrows `available` districts by `filter`.
///
/// Returns normalized names, sorted. Districts without the figure a stage
/// filters on are dropped by that stage.
#[must_use]
pub fn filter_districts<S: AsRef<str>>(
    available: &[S],
    regions: &RegionTable,
    stats: &BTreeMap<String, DistrictStats>,
    filter: &DistrictFilter,
) -> Vec<String> {
    let mut candidates: BTreeSet<String> = available
        .iter()
        .map(|d| normalize_district_name(d.as_ref()))
        .collect();

    if !filter.regions.is_empty() {
        let in_regions = regions.districts_in(&filter.regions);
        candidates.retain(|d| in_regions.contains(d));
        log::debug!(
            "{} districts in regions {:?}",
            candidates.len(),
            filter.regions
        );
    }

    if !filter.mean_income.is_unbounded() {
        retain_stage(&mut candidates, stats, "mean income", |s| {
            s.mean_income.is_some_and(|v| filter.mean_income.contains(v))
        });
    }
    if !filter.population.is_unbounded() {
        retain_stage(&mut candidates, stats, "population", |s| {
            s.population.is_some_and(|v| filter.population.contains(v))
        });
    }
    if !filter.density.is_unbounded() {
        retain_stage(&mut candidates, stats, "density", |s| {
            s.density.is_some_and(|v| filter.density.contains(v))
        });
    }

    candidates.into_iter().collect()
}

fn retain_stage(
    candidates: &mut BTreeSet<String>,
    stats: &BTreeMap<String, DistrictStats>,
    label: &str,
    keep: impl Fn(&DistrictStats) -> bool,
) {
    if candidates.len() < 2 {
        return;
    }
    candidates.retain(|d| stats.get(d).is_some_and(&keep));
    log::debug!("{} districts after {label} filter", candidates.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, income: f64, population: u64, density: f64) -> DistrictStats {
        DistrictStats {
            name: name.to_string(),
            mean_income: Some(income),
            population: Some(population),
            density: Some(density),
        }
    }

    fn sample_stats() -> BTreeMap<String, DistrictStats> {
        index_stats(&[
            stats("Pinheiros", 9_000.0, 65_000, 8_500.0),
            stats("Lapa", 6_000.0, 70_000, 7_000.0),
            stats("Butantã", 5_000.0, 55_000, 4_000.0),
            stats("Sé", 3_000.0, 24_000, 12_000.0),
        ])
    }

    const AVAILABLE: [&str; 4] = ["PINHEIROS", "LAPA", "BUTANTA", "SE"];

    #[test]
    fn no_criteria_keeps_everything_sorted() {
        let result = filter_districts(
            &AVAILABLE,
            &RegionTable::sao_paulo(),
            &sample_stats(),
            &DistrictFilter::default(),
        );
        assert_eq!(result, vec!["BUTANTA", "LAPA", "PINHEIROS", "SE"]);
    }

    #[test]
    fn filters_by_region() {
        let filter = DistrictFilter {
            regions: vec![Region::Centro],
            ..DistrictFilter::default()
        };
        let result = filter_districts(
            &AVAILABLE,
            &RegionTable::sao_paulo(),
            &sample_stats(),
            &filter,
        );
        assert_eq!(result, vec!["SE"]);
    }

    #[test]
    fn applies_stages_in_order() {
        let filter = DistrictFilter {
            regions: vec![Region::Oeste],
            mean_income: Range::new(Some(5_500.0), None),
            population: Range::new(None, Some(68_000)),
            ..DistrictFilter::default()
        };
        let result = filter_districts(
            &AVAILABLE,
            &RegionTable::sao_paulo(),
            &sample_stats(),
            &filter,
        );
        assert_eq!(result, vec!["PINHEIROS"]);
    }

    #[test]
    fn numeric_stages_stop_below_two_candidates() {
        // Only Se is in Centro, so the income bound that would exclude it
        // never runs.
        let filter = DistrictFilter {
            regions: vec![Region::Centro],
            mean_income: Range::new(Some(100_000.0), None),
            ..DistrictFilter::default()
        };
        let result = filter_districts(
            &AVAILABLE,
            &RegionTable::sao_paulo(),
            &sample_stats(),
            &filter,
        );
        assert_eq!(result, vec!["SE"]);
    }

    #[test]
    fn missing_stats_are_dropped_by_active_stage() {
        let filter = DistrictFilter {
            density: Range::new(Some(0.0), None),
            ..DistrictFilter::default()
        };
        let result = filter_districts(
            &["PINHEIROS", "LAPA", "MOOCA"],
            &RegionTable::sao_paulo(),
            &sample_stats(),
            &filter,
        );
        assert_eq!(result, vec!["LAPA", "PINHEIROS"]);
    }
}
