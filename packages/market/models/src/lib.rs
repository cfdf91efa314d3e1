#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Real-estate launch and sales record types.
//!
//! Rows of the market table are keyed by RGI, the registry identifier that
//! joins a launch to a coordinate in the separate coordinate lookup table.
//! Field names on the CSV side are the Portuguese column headers used by
//! the source spreadsheets.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the market table, as read from CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Registry identifier.
    #[serde(rename = "RGI")]
    pub rgi: String,
    /// Development name.
    #[serde(rename = "Empreendimento", default)]
    pub development: String,
    /// Developer group short name.
    #[serde(rename = "Grupo Incorporador Apelido", default)]
    pub developer_group: String,
    /// Launch date as written in the source; see `parse_launch_date`.
    #[serde(rename = "Data Lançamento", default)]
    pub launch_date: String,
    /// Units launched.
    #[serde(rename = "Nº Total de Unidades", default)]
    pub total_units: u64,
    /// Units sold.
    #[serde(rename = "Unidades Vendidas", default)]
    pub sold_units: u64,
    /// Units still in stock.
    #[serde(rename = "Qtd em Estoque", default)]
    pub stock_units: u64,
}

/// One row of the RGI coordinate lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RgiCoordinate {
    #[serde(rename = "RGI")]
    pub rgi: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Units and sales speed for a single development.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentSummary {
    pub rgi: String,
    pub development: String,
    pub total_units: u64,
    pub sold_units: u64,
    pub stock_units: u64,
    /// Sold over launched, as a percentage rounded to two decimals.
    /// `None` when nothing was launched.
    pub vso_percent: Option<f64>,
}

/// Totals across a set of market records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTotals {
    pub total_launched: u64,
    pub total_sold: u64,
    pub total_stock: u64,
    /// Overall VSO. `None` when nothing was launched.
    pub vso_percent: Option<f64>,
}

/// Inclusive `[min, max]` bound. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    #[must_use]
    pub const fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// `true` if `value` lies within the bound.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Dashboard filters over market records. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFilter {
    /// Developer groups to keep. `None` keeps every group.
    pub developer_groups: Option<BTreeSet<String>>,
    pub launch_date: Range<NaiveDate>,
    /// Open sides fall back to 0 and 100 percent.
    pub vso_percent: Range<f64>,
    pub total_units: Range<u64>,
    pub stock_units: Range<u64>,
    pub sold_units: Range<u64>,
}

/// Everything the market dashboard displays for a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDashboard {
    pub totals: MarketTotals,
    pub developments: Vec<DevelopmentSummary>,
    pub records: Vec<MarketRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let range = Range::new(Some(10), Some(20));
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }

    #[test]
    fn open_ranges() {
        assert!(Range::<u64>::default().contains(u64::MAX));
        assert!(Range::<u64>::default().is_unbounded());
        assert!(Range::new(None, Some(5.0)).contains(-100.0));
        assert!(!Range::new(Some(5.0), None).contains(4.9));
    }

    #[test]
    fn nan_fails_any_float_bound() {
        assert!(!Range::new(Some(0.0), None).contains(f64::NAN));
        assert!(!Range::new(None, Some(100.0)).contains(f64::NAN));
    }

    #[test]
    fn deserializes_portuguese_headers() {
        let data = "RGI,Empreendimento,Grupo Incorporador Apelido,Data Lançamento,Nº Total de Unidades,Unidades Vendidas,Qtd em Estoque\n\
                    1001,Residencial Se,NORTIS,2023-05-10,120,90,30\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let record: MarketRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(record.rgi, "1001");
        assert_eq!(record.developer_group, "NORTIS");
        assert_eq!(record.total_units, 120);
        assert_eq!(record.stock_units, 30);
    }
}
