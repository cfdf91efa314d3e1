//! Dashboard filters over market records.

use chrono::{NaiveDate, NaiveDateTime};
use parcel_scout_market_models::{MarketFilter, MarketRecord};

use crate::summary::vso_percent;

/// VSO bound applied when the filter leaves a side open.
pub const DEFAULT_VSO_RANGE: (f64, f64) = (0.0, 100.0);

/// Parses a launch date in any of the formats seen in source spreadsheets.
///
/// Accepts `2023-05-10`, `10/05/2023`, and `2023-05-10 00:00:00`.
#[must_use]
pub fn parse_launch_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .ok()
}

/// `true` if `record` satisfies every criterion of `filter`.
///
/// Records with an unparsable launch date fail any date bound. The VSO
/// bound always applies, with open sides defaulting to
/// [`DEFAULT_VSO_RANGE`], so records with no launched units or more sales
/// than units never match.
#[must_use]
pub fn matches(record: &MarketRecord, filter: &MarketFilter) -> bool {
    if let Some(groups) = &filter.developer_groups
        && !groups.contains(&record.developer_group)
    {
        return false;
    }

    if !filter.launch_date.is_unbounded() {
        let Some(date) = parse_launch_date(&record.launch_date) else {
            log::trace!(
                "RGI {} has unparsable launch date '{}'",
                record.rgi,
                record.launch_date
            );
            return false;
        };
        if !filter.launch_date.contains(date) {
            return false;
        }
    }

    let (default_min, default_max) = DEFAULT_VSO_RANGE;
    let min = filter.vso_percent.min.unwrap_or(default_min);
    let max = filter.vso_percent.max.unwrap_or(default_max);
    match vso_percent(record.sold_units, record.total_units) {
        Some(vso) if (min..=max).contains(&vso) => {}
        other => {
            log::trace!("RGI {} has VSO {other:?} outside {min}..={max}", record.rgi);
            return false;
        }
    }

    filter.total_units.contains(record.total_units)
        && filter.stock_units.contains(record.stock_units)
        && filter.sold_units.contains(record.sold_units)
}

/// Keeps the records that satisfy `filter`, in input order.
#[must_use]
pub fn apply_filter(records: &[MarketRecord], filter: &MarketFilter) -> Vec<MarketRecord> {
    records
        .iter()
        .filter(|record| matches(record, filter))
        .cloned()
        .collect()
}
