//! Subcommand handlers.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use parcel_scout_catalog::progress::{ProgressCallback, null_progress};
use parcel_scout_catalog::{
    districts_of, load_coordinates_csv, load_district_stats_csv, load_market_csv,
    load_parcels_geojson, load_points, paths,
};
use parcel_scout_cli_utils::{IndicatifProgress, MultiProgress};
use parcel_scout_district::{Region, RegionTable, filter_districts, index_stats};
use parcel_scout_market::{build_dashboard, records_for_rgis, rgis_near};
use parcel_scout_proximity::{Coordinate, DEFAULT_RADIUS_METERS, PointCatalog, ProximityQuery};
use parcel_scout_scoring::{PointsLookup, default_lookup, load_lookup, score_selection};
use serde::Serialize;

use crate::args::{CatalogKind, DistrictFilterArgs, MarketFilterArgs, ReferenceArgs};
use crate::output;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Settings shared by every subcommand.
pub struct Context {
    pub data_dir: PathBuf,
    pub json: bool,
    pub multi: MultiProgress,
}

impl Context {
    /// Progress for a multi-file load. JSON output stays free of bars.
    fn files_progress(&self, label: &str) -> Arc<dyn ProgressCallback> {
        if self.json {
            null_progress()
        } else {
            IndicatifProgress::files_bar(&self.multi, label)
        }
    }

    /// Progress for a single-file load.
    fn spinner(&self, label: &str) -> Arc<dyn ProgressCallback> {
        if self.json {
            null_progress()
        } else {
            IndicatifProgress::spinner(&self.multi, label)
        }
    }

    fn resolve_references(
        &self,
        references: &ReferenceArgs,
    ) -> Result<Vec<Coordinate>, Box<dyn std::error::Error>> {
        let progress = if references.selects_parcels() {
            self.spinner("parcels")
        } else {
            null_progress()
        };
        references.resolve(&self.data_dir, progress.as_ref())
    }

    fn load_catalog(
        &self,
        path: &Path,
        label: &str,
    ) -> Result<PointCatalog, Box<dyn std::error::Error>> {
        let progress = self.files_progress(label);
        let points = load_points(path, progress.as_ref())?;
        let catalog = PointCatalog::new(points);
        log::info!(
            "{label}: {} points in {} categories",
            catalog.len(),
            catalog.categories().len()
        );
        Ok(catalog)
    }
}

fn lookup_or_default(path: Option<&Path>) -> Result<PointsLookup, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => load_lookup(path)?,
        None => default_lookup(),
    })
}

#[derive(Args, Debug)]
pub struct NearbyArgs {
    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Catalog to query
    #[arg(long, value_enum, default_value_t = CatalogKind::Mobility)]
    pub catalog: CatalogKind,

    /// Point CSV file or directory, replacing the catalog's default location
    #[arg(long)]
    pub points: Option<PathBuf>,

    /// Search radius in meters
    #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
    pub radius: f64,

    /// Only consider this category (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Show only the nearest point of each category
    #[arg(long)]
    pub nearest: bool,
}

pub fn nearby(ctx: &Context, args: &NearbyArgs) -> CommandResult {
    let references = ctx.resolve_references(&args.references)?;
    let path = args
        .points
        .clone()
        .unwrap_or_else(|| args.catalog.default_path(&ctx.data_dir));

    let mut catalog = ctx.load_catalog(&path, "points")?;
    if !args.categories.is_empty() {
        catalog = catalog.select_categories(&args.categories);
    }

    let query = ProximityQuery::new(references, args.radius);
    if args.nearest {
        let nearest = query.nearest(&catalog);
        if ctx.json {
            output::print_json(&nearest)?;
        } else {
            output::print_nearest(&nearest);
        }
    } else {
        let results = query.run(&catalog);
        if ctx.json {
            output::print_json(&results)?;
        } else {
            output::print_distances(&results);
        }
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Mobility point CSV file or directory [default: <data-dir>/mobility]
    #[arg(long)]
    pub mobility: Option<PathBuf>,

    /// Establishment point CSV file or directory [default: <data-dir>/establishments]
    #[arg(long)]
    pub establishments: Option<PathBuf>,

    /// Points lookup TOML, replacing the built-in one
    #[arg(long)]
    pub lookup: Option<PathBuf>,

    /// Search radius in meters
    #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
    pub radius: f64,

    /// Also write the table to this CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

pub fn score(ctx: &Context, args: &ScoreArgs) -> CommandResult {
    let references = ctx.resolve_references(&args.references)?;
    let lookup = lookup_or_default(args.lookup.as_deref())?;

    let mobility_path = args
        .mobility
        .clone()
        .unwrap_or_else(|| paths::mobility_dir(&ctx.data_dir));
    let establishments_path = args
        .establishments
        .clone()
        .unwrap_or_else(|| paths::establishments_dir(&ctx.data_dir));

    let mobility = ctx.load_catalog(&mobility_path, "mobility")?;
    let establishments = ctx.load_catalog(&establishments_path, "establishments")?;

    let table = score_selection(&mobility, &establishments, &references, args.radius, &lookup);

    if let Some(path) = &args.csv {
        output::write_score_csv(&table, path)?;
    }

    if ctx.json {
        output::print_json(&table)?;
    } else {
        output::print_score_table(&table);
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct MarketArgs {
    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Market table CSV [default: <data-dir>/market.csv]
    #[arg(long)]
    pub market: Option<PathBuf>,

    /// RGI coordinate CSV [default: <data-dir>/rgi_coordinates.csv]
    #[arg(long)]
    pub coordinates: Option<PathBuf>,

    /// Search radius in meters
    #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
    pub radius: f64,

    #[command(flatten)]
    pub filter: MarketFilterArgs,
}

pub fn market(ctx: &Context, args: &MarketArgs) -> CommandResult {
    let references = ctx.resolve_references(&args.references)?;

    let coordinates_path = args
        .coordinates
        .clone()
        .unwrap_or_else(|| paths::coordinates_file(&ctx.data_dir));
    let market_path = args
        .market
        .clone()
        .unwrap_or_else(|| paths::market_file(&ctx.data_dir));

    let coordinates = load_coordinates_csv(&coordinates_path)?;
    let records = load_market_csv(&market_path)?;

    // Union over references, keeping first-seen order.
    let mut seen = BTreeSet::new();
    let rgis: Vec<String> = references
        .iter()
        .flat_map(|center| rgis_near(&coordinates, *center, args.radius))
        .filter(|rgi| seen.insert(rgi.clone()))
        .collect();
    log::info!("{} RGIs within {} m", rgis.len(), args.radius);

    let nearby = records_for_rgis(&records, &rgis);
    let dashboard = build_dashboard(&nearby, &args.filter.to_filter())?;

    if ctx.json {
        output::print_json(&dashboard)?;
    } else {
        output::print_dashboard(&dashboard);
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct DistrictsArgs {
    /// Parcel `GeoJSON` whose districts are the candidates [default: <data-dir>/parcels.geojson]
    #[arg(long)]
    pub parcels: Option<PathBuf>,

    /// District demographics CSV [default: <data-dir>/district_stats.csv]
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Region table TOML, replacing the built-in Sao Paulo table
    #[arg(long)]
    pub region_table: Option<PathBuf>,

    #[command(flatten)]
    pub filter: DistrictFilterArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DistrictsReport {
    regions_present: Vec<String>,
    districts: Vec<DistrictRow>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DistrictRow {
    pub name: String,
    /// `None` for districts the region table does not list.
    pub region: Option<Region>,
}

fn district_rows(names: Vec<String>, table: &RegionTable) -> Vec<DistrictRow> {
    names
        .into_iter()
        .map(|name| DistrictRow {
            region: table.region_of(&name),
            name,
        })
        .collect()
}

pub fn districts(ctx: &Context, args: &DistrictsArgs) -> CommandResult {
    let table = match &args.region_table {
        Some(path) => RegionTable::load(path)?,
        None => RegionTable::sao_paulo(),
    };
    log::debug!("Region table lists {} districts", table.district_count());

    let parcels_path = args
        .parcels
        .clone()
        .unwrap_or_else(|| paths::parcels_file(&ctx.data_dir));
    let stats_path = args
        .stats
        .clone()
        .unwrap_or_else(|| paths::district_stats_file(&ctx.data_dir));

    let progress = ctx.spinner("parcels");
    let parcels =
        load_parcels_geojson(&parcels_path).inspect_err(|_| progress.finish_and_clear())?;
    progress.finish(format!("{} parcels", parcels.len()));
    let available = districts_of(&parcels);
    let stats = index_stats(&load_district_stats_csv(&stats_path)?);

    let report = DistrictsReport {
        regions_present: table
            .regions_present(&available)
            .iter()
            .map(ToString::to_string)
            .collect(),
        districts: district_rows(
            filter_districts(&available, &table, &stats, &args.filter.to_filter()),
            &table,
        ),
    };

    if ctx.json {
        output::print_json(&report)?;
    } else {
        println!("Regions: {}", report.regions_present.join(", "));
        println!();
        output::write_district_rows(&report.districts, &mut std::io::stdout().lock())?;
    }

    Ok(())
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Points lookup TOML to validate and print instead of the built-in one
    #[arg(long)]
    pub lookup: Option<PathBuf>,

    /// Print the lookup as TOML instead of a table
    #[arg(long)]
    pub toml: bool,
}

pub fn lookup(ctx: &Context, args: &LookupArgs) -> CommandResult {
    let lookup = lookup_or_default(args.lookup.as_deref())?;

    if ctx.json {
        output::print_json(&lookup)?;
    } else if args.toml {
        output::write_lookup_toml(&lookup, &mut std::io::stdout().lock())?;
    } else {
        output::write_lookup_table(&lookup, &mut std::io::stdout().lock())?;
    }

    Ok(())
}
