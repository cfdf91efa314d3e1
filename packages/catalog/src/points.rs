//! Point catalog CSV loader.
//!
//! A point file has a `Latitude` and a `Longitude` column and usually a
//! `Tipo` column naming the category. Files without `Tipo` take their
//! category from the file stem, so a directory of per-category exports
//! (`Ciclovia.csv`, `Hospital.csv`, ...) loads as one catalog. An `id` or
//! `ID` column becomes the point id. Every other column is kept as an
//! attribute.

use std::io::Read;
use std::path::{Path, PathBuf};

use parcel_scout_proximity_models::CatalogPoint;

use crate::progress::ProgressCallback;
use crate::{CatalogError, column_index, field, required_column};

const CATEGORY_COLUMN: &str = "Tipo";
const LATITUDE_COLUMN: &str = "Latitude";
const LONGITUDE_COLUMN: &str = "Longitude";
const ID_COLUMNS: [&str; 2] = ["id", "ID"];

/// Loads a catalog from a single CSV file.
///
/// # Errors
///
/// * [`CatalogError::Io`] if the file cannot be opened
/// * [`CatalogError::Csv`] if the header row cannot be read
/// * [`CatalogError::MissingColumn`] if a coordinate column is absent
pub fn load_points_csv(path: &Path) -> Result<Vec<CatalogPoint>, CatalogError> {
    let label = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: label.clone(),
        source: e,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned());

    let points = read_points(file, &label, stem.as_deref())?;
    log::debug!("  loaded {} points from {label}", points.len());
    Ok(points)
}

/// Loads every `.csv` file in `dir`, in file name order.
///
/// Files that fail to load are skipped with a warning.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] if `dir` does not exist, or
/// [`CatalogError::Io`] if it cannot be listed.
pub fn load_points_dir(
    dir: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Vec<CatalogPoint>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::NotFound(dir.display().to_string()));
    }

    let csv_files = collect_csv_files(dir)?;
    if csv_files.is_empty() {
        log::warn!("No CSV files found in {}", dir.display());
    }

    progress.set_total(csv_files.len() as u64);

    let mut points = Vec::new();
    for csv_path in &csv_files {
        if let Some(name) = csv_path.file_name() {
            progress.set_message(name.to_string_lossy().into_owned());
        }
        match load_points_csv(csv_path) {
            Ok(mut loaded) => points.append(&mut loaded),
            Err(e) => log::warn!("  skipping {}: {e}", csv_path.display()),
        }
        progress.inc(1);
    }

    progress.finish(format!("{} points", points.len()));
    log::info!(
        "Loaded {} points from {} files in {}",
        points.len(),
        csv_files.len(),
        dir.display()
    );

    Ok(points)
}

/// Loads a catalog from a CSV file or a directory of them.
///
/// # Errors
///
/// See [`load_points_csv`] and [`load_points_dir`].
pub fn load_points(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Vec<CatalogPoint>, CatalogError> {
    if path.is_dir() {
        load_points_dir(path, progress)
    } else if path.exists() {
        load_points_csv(path)
    } else {
        Err(CatalogError::NotFound(path.display().to_string()))
    }
}

fn read_points<R: Read>(
    reader: R,
    path: &str,
    fallback_category: Option<&str>,
) -> Result<Vec<CatalogPoint>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| CatalogError::Csv {
            path: path.to_string(),
            source: e,
        })?
        .clone();

    let lat_idx = required_column(&headers, LATITUDE_COLUMN, path)?;
    let lon_idx = required_column(&headers, LONGITUDE_COLUMN, path)?;
    let category_idx = column_index(&headers, &[CATEGORY_COLUMN]);
    let id_idx = column_index(&headers, &ID_COLUMNS);

    if category_idx.is_none() && fallback_category.is_none() {
        return Err(CatalogError::MissingColumn {
            path: path.to_string(),
            column: CATEGORY_COLUMN.to_string(),
        });
    }

    let reserved = [Some(lat_idx), Some(lon_idx), category_idx, id_idx];

    let mut points = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::trace!("  skipping malformed row {row} in {path}: {e}");
                continue;
            }
        };

        let Some(category) = field(&record, category_idx).or(fallback_category) else {
            log::trace!("  skipping row {row} in {path}: no category");
            continue;
        };

        let mut point = CatalogPoint::new(
            category,
            parse_degrees(record.get(lat_idx)),
            parse_degrees(record.get(lon_idx)),
        );
        if let Some(id) = field(&record, id_idx) {
            point = point.with_id(id);
        }

        for (i, (header, value)) in headers.iter().zip(record.iter()).enumerate() {
            if !reserved.contains(&Some(i)) {
                point
                    .attributes
                    .insert(header.trim().to_string(), value.trim().to_string());
            }
        }

        points.push(point);
    }

    Ok(points)
}

/// Parses a coordinate cell. Anything unparsable becomes `NaN`.
fn parse_degrees(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn collect_csv_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();

    Ok(files)
}
