//! Unit totals and VSO (sales over supply).

use std::collections::BTreeMap;

use parcel_scout_market_models::{DevelopmentSummary, MarketRecord, MarketTotals};

/// Units sold over units launched, as a percentage.
///
/// Returns `None` when nothing was launched.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vso_percent(sold_units: u64, total_units: u64) -> Option<f64> {
    (total_units > 0).then(|| sold_units as f64 / total_units as f64 * 100.0)
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups records by (RGI, development) and sums their units.
///
/// Output is ordered by RGI, then development name. VSO is rounded to two
/// decimals.
#[must_use]
pub fn summarize_by_development(records: &[MarketRecord]) -> Vec<DevelopmentSummary> {
    let mut groups: BTreeMap<(&str, &str), (u64, u64, u64)> = BTreeMap::new();

    for record in records {
        let totals = groups
            .entry((record.rgi.as_str(), record.development.as_str()))
            .or_default();
        totals.0 += record.total_units;
        totals.1 += record.sold_units;
        totals.2 += record.stock_units;
    }

    groups
        .into_iter()
        .map(|((rgi, development), (total, sold, stock))| DevelopmentSummary {
            rgi: rgi.to_string(),
            development: development.to_string(),
            total_units: total,
            sold_units: sold,
            stock_units: stock,
            vso_percent: vso_percent(sold, total).map(round_2),
        })
        .collect()
}

/// Sums launched, sold, and stock units across all records.
#[must_use]
pub fn market_totals(records: &[MarketRecord]) -> MarketTotals {
    let total_launched = records.iter().map(|r| r.total_units).sum();
    let total_sold = records.iter().map(|r| r.sold_units).sum();
    let total_stock = records.iter().map(|r| r.stock_units).sum();

    MarketTotals {
        total_launched,
        total_sold,
        total_stock,
        vso_percent: vso_percent(total_sold, total_launched),
    }
}
