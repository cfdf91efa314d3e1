#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Market lookups and dashboard aggregation for real-estate launches.
//!
//! Finds the RGIs within a radius of a map coordinate, pulls their market
//! records, and summarizes them into unit totals and VSO per development.

pub mod filter;
pub mod summary;

use std::collections::BTreeSet;

use parcel_scout_proximity::{CatalogPoint, Coordinate, ids_within_radius};
use thiserror::Error;

pub use filter::{DEFAULT_VSO_RANGE, apply_filter, matches, parse_launch_date};
pub use parcel_scout_market_models::{
    DevelopmentSummary, MarketDashboard, MarketFilter, MarketRecord, MarketTotals, Range,
    RgiCoordinate,
};
pub use summary::{market_totals, summarize_by_development, vso_percent};

/// Reasons the market dashboard cannot be built for a record set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// No records to analyze.
    #[error("No market data available for analysis")]
    NoData,

    /// The dashboard compares developments and needs at least two RGIs.
    #[error("Cannot build the dashboard with a single RGI ({rgi})")]
    SingleRgi {
        /// The only RGI present.
        rgi: String,
    },

    /// The filters removed every record.
    #[error("No records match the selected filters")]
    NoMatches,
}

/// RGIs whose coordinates lie within `radius_meters` of `center`.
///
/// Coordinate rows with invalid latitude/longitude are skipped. Output
/// follows the lookup table's order.
#[must_use]
pub fn rgis_near(
    coordinates: &[RgiCoordinate],
    center: Coordinate,
    radius_meters: f64,
) -> Vec<String> {
    let points: Vec<CatalogPoint> = coordinates
        .iter()
        .map(|c| CatalogPoint::new("RGI", c.latitude, c.longitude).with_id(c.rgi.clone()))
        .collect();

    let rgis = ids_within_radius(&points, center, radius_meters);
    log::debug!("{} RGIs within {radius_meters} m of {center}", rgis.len());
    rgis
}

/// Market records whose RGI is in `rgis`, in input order.
#[must_use]
pub fn records_for_rgis<S: AsRef<str>>(records: &[MarketRecord], rgis: &[S]) -> Vec<MarketRecord> {
    let wanted: BTreeSet<&str> = rgis.iter().map(AsRef::as_ref).collect();
    records
        .iter()
        .filter(|r| wanted.contains(r.rgi.as_str()))
        .cloned()
        .collect()
}

fn require_multiple_rgis(records: &[MarketRecord]) -> Result<(), MarketError> {
    let distinct: BTreeSet<&str> = records.iter().map(|r| r.rgi.as_str()).collect();
    if distinct.len() == 1 {
        let rgi = distinct.into_iter().next().unwrap_or_default().to_string();
        return Err(MarketError::SingleRgi { rgi });
    }
    Ok(())
}

/// Filters `records` and summarizes what remains.
///
/// # Errors
///
/// * [`MarketError::NoData`] if `records` is empty
/// * [`MarketError::SingleRgi`] if only one RGI is present, before or after
///   filtering
/// * [`MarketError::NoMatches`] if the filter removes every record
pub fn build_dashboard(
    records: &[MarketRecord],
    filter: &MarketFilter,
) -> Result<MarketDashboard, MarketError> {
    if records.is_empty() {
        return Err(MarketError::NoData);
    }
    require_multiple_rgis(records)?;

    let filtered = apply_filter(records, filter);
    if filtered.is_empty() {
        return Err(MarketError::NoMatches);
    }
    require_multiple_rgis(&filtered)?;

    log::info!(
        "Market dashboard: {} of {} records after filters",
        filtered.len(),
        records.len()
    );

    Ok(MarketDashboard {
        totals: market_totals(&filtered),
        developments: summarize_by_development(&filtered),
        records: filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SE: Coordinate = Coordinate::new(-23.55028, -46.63389);

    fn record(rgi: &str, group: &str, total: u64, sold: u64) -> MarketRecord {
        MarketRecord {
            rgi: rgi.to_string(),
            development: format!("Residencial {rgi}"),
            developer_group: group.to_string(),
            launch_date: "2023-01-01".to_string(),
            total_units: total,
            sold_units: sold,
            stock_units: total - sold,
        }
    }

    fn coordinate(rgi: &str, latitude: f64, longitude: f64) -> RgiCoordinate {
        RgiCoordinate {
            rgi: rgi.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn finds_rgis_near_coordinate() {
        let lookup = vec![
            coordinate("1001", -23.5505, -46.6340),
            coordinate("1002", -23.6500, -46.7000),
            coordinate("1003", 200.0, -46.6340),
            coordinate("1004", -23.5520, -46.6330),
        ];

        assert_eq!(rgis_near(&lookup, SE, 500.0), vec!["1001", "1004"]);
        assert!(rgis_near(&[], SE, 500.0).is_empty());
    }

    #[test]
    fn selects_records_for_rgis() {
        let records = vec![
            record("1", "NORTIS", 10, 5),
            record("2", "NORTIS", 10, 5),
            record("1", "VIBRA", 10, 5),
        ];
        let selected = records_for_rgis(&records, &["1"]);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.rgi == "1"));
    }

    #[test]
    fn dashboard_requires_data() {
        assert_eq!(
            build_dashboard(&[], &MarketFilter::default()),
            Err(MarketError::NoData)
        );
    }

    #[test]
    fn dashboard_rejects_single_rgi() {
        let records = vec![record("1", "NORTIS", 10, 5), record("1", "VIBRA", 20, 5)];
        assert_eq!(
            build_dashboard(&records, &MarketFilter::default()),
            Err(MarketError::SingleRgi {
                rgi: "1".to_string()
            })
        );
    }

    #[test]
    fn dashboard_rejects_single_rgi_after_filtering() {
        let records = vec![record("1", "NORTIS", 10, 5), record("2", "VIBRA", 20, 5)];
        let filter = MarketFilter {
            developer_groups: Some(BTreeSet::from(["VIBRA".to_string()])),
            ..MarketFilter::default()
        };
        assert!(matches!(
            build_dashboard(&records, &filter),
            Err(MarketError::SingleRgi { .. })
        ));
    }

    #[test]
    fn dashboard_reports_empty_filter_result() {
        let records = vec![record("1", "NORTIS", 10, 5), record("2", "VIBRA", 20, 5)];
        let filter = MarketFilter {
            total_units: Range::new(Some(1_000), None),
            ..MarketFilter::default()
        };
        assert_eq!(build_dashboard(&records, &filter), Err(MarketError::NoMatches));
    }

    #[test]
    fn dashboard_summarizes_filtered_records() {
        let records = vec![
            record("1", "NORTIS", 100, 50),
            record("2", "VIBRA", 100, 25),
            record("3", "OUTRA", 10, 10),
        ];
        let filter = MarketFilter {
            developer_groups: Some(BTreeSet::from(["NORTIS".to_string(), "VIBRA".to_string()])),
            ..MarketFilter::default()
        };

        let dashboard = build_dashboard(&records, &filter).unwrap();
        assert_eq!(dashboard.records.len(), 2);
        assert_eq!(dashboard.developments.len(), 2);
        assert_eq!(dashboard.totals.total_launched, 200);
        assert_eq!(dashboard.totals.total_sold, 75);
        assert_eq!(dashboard.totals.vso_percent, Some(37.5));
    }
}
