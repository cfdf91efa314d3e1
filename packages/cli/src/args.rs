//! Argument groups shared by several subcommands.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use parcel_scout_catalog::progress::ProgressCallback;
use parcel_scout_catalog::{
    ParcelSelection, load_parcels_geojson, paths, reference_points, select_parcels,
};
use parcel_scout_district::{DistrictFilter, Region};
use parcel_scout_market::{MarketFilter, Range};
use parcel_scout_proximity::Coordinate;

/// Where the reference coordinates come from.
#[derive(Args, Debug, Clone, Default)]
pub struct ReferenceArgs {
    /// Reference coordinate (repeatable)
    #[arg(long = "ref", value_name = "LAT,LON", allow_hyphen_values = true)]
    pub references: Vec<Coordinate>,

    /// Parcel `GeoJSON` file [default: <data-dir>/parcels.geojson]
    #[arg(long)]
    pub parcels: Option<PathBuf>,

    /// Select the parcel with this SQL identifier (repeatable)
    #[arg(long = "sql", value_name = "SQL")]
    pub sql_ids: Vec<String>,

    /// Select parcels in this district
    #[arg(long)]
    pub district: Option<String>,

    /// Select parcels with this zoning type (repeatable)
    #[arg(long = "zone-type", value_name = "TYPE")]
    pub zone_types: Vec<String>,
}

impl ReferenceArgs {
    #[must_use]
    pub fn selects_parcels(&self) -> bool {
        self.parcels.is_some()
            || !self.sql_ids.is_empty()
            || self.district.is_some()
            || !self.zone_types.is_empty()
    }

    fn selection(&self) -> ParcelSelection {
        ParcelSelection {
            sql_ids: self.sql_ids.iter().cloned().collect(),
            district: self.district.clone(),
            zone_types: self.zone_types.iter().cloned().collect(),
        }
    }

    /// Explicit coordinates followed by the centroids of the selected
    /// parcels. `progress` is finished once the parcel file is loaded and
    /// is left untouched when no parcels are selected.
    ///
    /// # Errors
    ///
    /// Fails if the parcel file cannot be loaded, the selection matches no
    /// parcel, or no reference is given at all.
    pub fn resolve(
        &self,
        data_dir: &Path,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<Coordinate>, Box<dyn std::error::Error>> {
        let mut references = self.references.clone();

        if self.selects_parcels() {
            let path = self
                .parcels
                .clone()
                .unwrap_or_else(|| paths::parcels_file(data_dir));
            progress.set_message(format!("Loading {}", path.display()));
            let parcels =
                load_parcels_geojson(&path).inspect_err(|_| progress.finish_and_clear())?;
            progress.finish(format!("{} parcels", parcels.len()));

            let selected = select_parcels(&parcels, &self.selection());
            if selected.is_empty() {
                let msg = format!("No parcels in {} match the selection", path.display());
                return Err(msg.into());
            }
            log::info!("Selected {} of {} parcels", selected.len(), parcels.len());
            references.extend(reference_points(selected));
        }

        if references.is_empty() {
            return Err(concat!(
                "No reference points: pass --ref LAT,LON or select parcels ",
                "with --sql, --district, or --zone-type"
            )
            .into());
        }

        Ok(references)
    }
}

/// Which point catalog to query.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Mobility,
    Establishments,
}

impl CatalogKind {
    /// Default location of this catalog under `data_dir`.
    #[must_use]
    pub fn default_path(self, data_dir: &Path) -> PathBuf {
        match self {
            Self::Mobility => paths::mobility_dir(data_dir),
            Self::Establishments => paths::establishments_dir(data_dir),
        }
    }
}

/// Market dashboard filters.
#[derive(Args, Debug, Clone, Default)]
pub struct MarketFilterArgs {
    /// Keep only this developer group (repeatable)
    #[arg(long = "developer", value_name = "GROUP")]
    pub developers: Vec<String>,

    /// Earliest launch date (YYYY-MM-DD)
    #[arg(long)]
    pub launched_from: Option<NaiveDate>,

    /// Latest launch date (YYYY-MM-DD)
    #[arg(long)]
    pub launched_to: Option<NaiveDate>,

    /// Minimum VSO, in percent [default: 0]
    #[arg(long)]
    pub min_vso: Option<f64>,

    /// Maximum VSO, in percent [default: 100]
    #[arg(long)]
    pub max_vso: Option<f64>,

    #[arg(long)]
    pub min_units: Option<u64>,

    #[arg(long)]
    pub max_units: Option<u64>,

    #[arg(long)]
    pub min_stock: Option<u64>,

    #[arg(long)]
    pub max_stock: Option<u64>,

    #[arg(long)]
    pub min_sold: Option<u64>,

    #[arg(long)]
    pub max_sold: Option<u64>,
}

impl MarketFilterArgs {
    #[must_use]
    pub fn to_filter(&self) -> MarketFilter {
        MarketFilter {
            developer_groups: (!self.developers.is_empty())
                .then(|| self.developers.iter().cloned().collect::<BTreeSet<_>>()),
            launch_date: Range::new(self.launched_from, self.launched_to),
            vso_percent: Range::new(self.min_vso, self.max_vso),
            total_units: Range::new(self.min_units, self.max_units),
            stock_units: Range::new(self.min_stock, self.max_stock),
            sold_units: Range::new(self.min_sold, self.max_sold),
        }
    }
}

/// District filter chain criteria.
#[derive(Args, Debug, Clone, Default)]
pub struct DistrictFilterArgs {
    /// Keep districts in this region (repeatable)
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<Region>,

    #[arg(long)]
    pub min_income: Option<f64>,

    #[arg(long)]
    pub max_income: Option<f64>,

    #[arg(long)]
    pub min_population: Option<u64>,

    #[arg(long)]
    pub max_population: Option<u64>,

    /// Minimum residents per square kilometer
    #[arg(long)]
    pub min_density: Option<f64>,

    /// Maximum residents per square kilometer
    #[arg(long)]
    pub max_density: Option<f64>,
}

impl DistrictFilterArgs {
    #[must_use]
    pub fn to_filter(&self) -> DistrictFilter {
        DistrictFilter {
            regions: self.regions.clone(),
            mean_income: Range::new(self.min_income, self.max_income),
            population: Range::new(self.min_population, self.max_population),
            density: Range::new(self.min_density, self.max_density),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use parcel_scout_catalog::progress::NullProgress;

    use super::*;

    #[derive(Default)]
    struct RecordingProgress {
        messages: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, _total: u64) {}
        fn set_position(&self, _pos: u64) {}
        fn inc(&self, _delta: u64) {}
        fn set_message(&self, msg: String) {
            self.messages.lock().unwrap().push(msg);
        }
        fn finish(&self, msg: String) {
            self.messages.lock().unwrap().push(msg);
        }
        fn finish_and_clear(&self) {
            self.messages.lock().unwrap().push("cleared".to_string());
        }
    }

    #[test]
    fn references_without_selection_are_used_as_is() {
        let args = ReferenceArgs {
            references: vec![Coordinate::new(-23.55, -46.63)],
            ..ReferenceArgs::default()
        };
        let progress = RecordingProgress::default();
        let resolved = args.resolve(Path::new("/nonexistent"), &progress).unwrap();
        assert_eq!(resolved, vec![Coordinate::new(-23.55, -46.63)]);
        assert!(progress.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn parcel_load_reports_progress() {
        let dir = std::env::temp_dir().join(format!("parcel_scout_args_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("parcels.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature",
            "properties":{"SQL":"001.002.0003-4","NOME_DIST":"Pinheiros"},
            "geometry":{"type":"Polygon","coordinates":[[[-46.70,-23.56],[-46.69,-23.56],
            [-46.69,-23.55],[-46.70,-23.55],[-46.70,-23.56]]]}}]}"#,
        )
        .unwrap();

        let args = ReferenceArgs {
            parcels: Some(path),
            sql_ids: vec!["001.002.0003-4".to_string()],
            ..ReferenceArgs::default()
        };
        let progress = RecordingProgress::default();
        let resolved = args.resolve(Path::new("/nonexistent"), &progress);
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(resolved.unwrap().len(), 1);
        let messages = progress.messages.lock().unwrap();
        assert!(messages[0].starts_with("Loading "));
        assert_eq!(messages[1], "1 parcels");
    }

    #[test]
    fn no_references_is_an_error() {
        assert!(
            ReferenceArgs::default()
                .resolve(Path::new("/nonexistent"), &NullProgress)
                .is_err()
        );
    }

    #[test]
    fn parcel_selection_needs_a_parcel_file() {
        let args = ReferenceArgs {
            district: Some("Pinheiros".to_string()),
            ..ReferenceArgs::default()
        };
        let progress = RecordingProgress::default();
        assert!(args.resolve(Path::new("/nonexistent"), &progress).is_err());
        assert_eq!(progress.messages.lock().unwrap().last().unwrap(), "cleared");
    }

    #[test]
    fn market_filter_from_args() {
        let args = MarketFilterArgs {
            developers: vec!["Alfa".to_string()],
            min_vso: Some(50.0),
            max_stock: Some(10),
            ..MarketFilterArgs::default()
        };
        let filter = args.to_filter();
        assert_eq!(
            filter.developer_groups,
            Some(BTreeSet::from(["Alfa".to_string()]))
        );
        assert_eq!(filter.vso_percent, Range::new(Some(50.0), None));
        assert_eq!(filter.stock_units, Range::new(None, Some(10)));
        assert!(filter.launch_date.is_unbounded());

        assert_eq!(MarketFilterArgs::default().to_filter(), MarketFilter::default());
    }

    #[test]
    fn district_filter_from_args() {
        let args = DistrictFilterArgs {
            regions: vec![Region::Oeste],
            min_population: Some(50_000),
            ..DistrictFilterArgs::default()
        };
        let filter = args.to_filter();
        assert_eq!(filter.regions, vec![Region::Oeste]);
        assert_eq!(filter.population, Range::new(Some(50_000), None));
        assert!(filter.mean_income.is_unbounded());
    }
}
