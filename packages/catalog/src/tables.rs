//! Market, RGI coordinate, and district demographic tables.

use std::io::Read;
use std::path::Path;

use parcel_scout_district::DistrictStats;
use parcel_scout_market_models::{MarketRecord, RgiCoordinate};
use serde::de::DeserializeOwned;

use crate::{CatalogError, column_index, field};

const DISTRICT_COLUMNS: [&str; 2] = ["Distrito", "Distritos"];
const INCOME_COLUMN: &str = "Renda Média";
const POPULATION_COLUMN: &str = "População";
const DENSITY_COLUMN: &str = "Densidade Demográfica";

/// Loads the market table.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be opened or
/// [`CatalogError::Csv`] if its header row cannot be read.
pub fn load_market_csv(path: &Path) -> Result<Vec<MarketRecord>, CatalogError> {
    load_rows(path)
}

/// Loads the RGI coordinate lookup table.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be opened or
/// [`CatalogError::Csv`] if its header row cannot be read.
pub fn load_coordinates_csv(path: &Path) -> Result<Vec<RgiCoordinate>, CatalogError> {
    load_rows(path)
}

/// Loads district demographics.
///
/// The file has a `Distrito` column and any of `Renda Média`,
/// `População`, and `Densidade Demográfica`. Blank or unparsable figures
/// are `None`.
///
/// # Errors
///
/// * [`CatalogError::Io`] if the file cannot be opened
/// * [`CatalogError::Csv`] if the header row cannot be read
/// * [`CatalogError::MissingColumn`] if there is no district column
pub fn load_district_stats_csv(path: &Path) -> Result<Vec<DistrictStats>, CatalogError> {
    let label = path.display().to_string();
    let file = open(path)?;
    let stats = read_district_stats(file, &label)?;
    log::info!("Loaded stats for {} districts from {label}", stats.len());
    Ok(stats)
}

fn open(path: &Path) -> Result<std::fs::File, CatalogError> {
    std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let label = path.display().to_string();
    let rows = read_rows(open(path)?, &label)?;
    log::info!("Loaded {} rows from {label}", rows.len());
    Ok(rows)
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R, path: &str) -> Result<Vec<T>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    rdr.headers().map_err(|e| CatalogError::Csv {
        path: path.to_string(),
        source: e,
    })?;

    let mut rows = Vec::new();
    let mut skipped = 0u64;
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                log::trace!("  skipping malformed row in {path}: {e}");
            }
        }
    }

    if skipped > 0 {
        log::debug!("  skipped {skipped} malformed rows in {path}");
    }

    Ok(rows)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_district_stats<R: Read>(reader: R, path: &str) -> Result<Vec<DistrictStats>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| CatalogError::Csv {
            path: path.to_string(),
            source: e,
        })?
        .clone();

    let Some(name_idx) = column_index(&headers, &DISTRICT_COLUMNS) else {
        return Err(CatalogError::MissingColumn {
            path: path.to_string(),
            column: DISTRICT_COLUMNS[0].to_string(),
        });
    };
    let income_idx = column_index(&headers, &[INCOME_COLUMN]);
    let population_idx = column_index(&headers, &[POPULATION_COLUMN]);
    let density_idx = column_index(&headers, &[DENSITY_COLUMN]);

    let mut stats = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("  skipping malformed row in {path}: {e}");
                continue;
            }
        };

        let Some(name) = field(&record, Some(name_idx)) else {
            continue;
        };

        stats.push(DistrictStats {
            name: name.to_string(),
            mean_income: field(&record, income_idx).and_then(parse_grouped_number),
            population: field(&record, population_idx)
                .and_then(parse_grouped_number)
                .filter(|v| *v >= 0.0)
                .map(|v| v.round() as u64),
            density: field(&record, density_idx).and_then(parse_grouped_number),
        });
    }

    Ok(stats)
}

/// Parses a number that may carry comma thousands separators
/// (`"12,345.67"`).
fn parse_grouped_number(value: &str) -> Option<f64> {
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
