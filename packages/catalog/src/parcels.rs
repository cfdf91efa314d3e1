//! Parcel polygons from `GeoJSON`.
//!
//! Each feature is one land parcel (lote) with its fiscal identifier
//! (`SQL`), district (`NOME_DIST`), zoning (`tipo`, `zl_zona`), a sale flag
//! (`venda`), and optionally a precomputed `Area` in square meters. The
//! parcel centroid is what proximity queries measure from.

use std::collections::BTreeSet;
use std::path::Path;

use geo::{Centroid, GeodesicArea, MultiPolygon};
use geojson::{Feature, GeoJson};
use parcel_scout_district::normalize_district_name;
use parcel_scout_proximity_models::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CatalogError;

/// A land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    /// Fiscal identifier.
    pub sql: String,
    pub district: Option<String>,
    /// Zoning category, e.g. `"ZEU"`.
    pub zone_type: Option<String>,
    /// Full zone code, e.g. `"ZEU-1"`.
    pub zone: Option<String>,
    /// Whether a sale has been recorded for the parcel.
    pub sold: bool,
    pub area_sq_m: f64,
    pub centroid: Coordinate,
}

/// Which parcels to analyze. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelSelection {
    pub sql_ids: BTreeSet<String>,
    /// Compared after district name normalization.
    pub district: Option<String>,
    pub zone_types: BTreeSet<String>,
}

/// Loads parcels from a `GeoJSON` file.
///
/// Features without a polygonal geometry or an identifier are skipped.
///
/// # Errors
///
/// * [`CatalogError::Io`] if the file cannot be read
/// * [`CatalogError::GeoJson`] if it is not valid `GeoJSON`
/// * [`CatalogError::NotFeatureCollection`] if it is a bare geometry
pub fn load_parcels_geojson(path: &Path) -> Result<Vec<Parcel>, CatalogError> {
    let label = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: label.clone(),
        source: e,
    })?;

    let parcels = parse_parcels(&contents, &label)?;
    log::info!("Loaded {} parcels from {label}", parcels.len());
    Ok(parcels)
}

fn parse_parcels(contents: &str, path: &str) -> Result<Vec<Parcel>, CatalogError> {
    let geojson: GeoJson = contents.parse().map_err(|e| CatalogError::GeoJson {
        path: path.to_string(),
        source: Box::new(e),
    })?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => return Err(CatalogError::NotFeatureCollection(path.to_string())),
    };

    let total = features.len();
    let parcels: Vec<Parcel> = features.iter().filter_map(parcel_from_feature).collect();
    if parcels.len() < total {
        log::debug!(
            "  skipped {} of {total} features in {path}",
            total - parcels.len()
        );
    }

    Ok(parcels)
}

fn parcel_from_feature(feature: &Feature) -> Option<Parcel> {
    let Some(polygons) = feature.geometry.clone().and_then(to_multipolygon) else {
        log::trace!("  skipping feature without polygon geometry");
        return None;
    };

    let sql = feature
        .property("SQL")
        .and_then(value_to_string)
        .or_else(|| feature.id.as_ref().map(id_to_string))?;

    let centroid = polygons.centroid()?;

    let area_sq_m = feature
        .property("Area")
        .and_then(value_to_f64)
        .filter(|a| a.is_finite())
        .unwrap_or_else(|| polygons.geodesic_area_unsigned());

    Some(Parcel {
        sql,
        district: feature.property("NOME_DIST").and_then(value_to_string),
        zone_type: feature.property("tipo").and_then(value_to_string),
        zone: feature.property("zl_zona").and_then(value_to_string),
        sold: feature.property("venda").is_some_and(value_to_bool),
        area_sq_m,
        centroid: Coordinate::new(centroid.y(), centroid.x()),
    })
}

fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_to_string(id: &geojson::feature::Id) -> String {
    match id {
        geojson::feature::Id::String(s) => s.clone(),
        geojson::feature::Id::Number(n) => n.to_string(),
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "sim" | "s" | "yes"
        ),
        _ => false,
    }
}

/// Parcels matching `selection`, in input order.
#[must_use]
pub fn select_parcels<'a>(parcels: &'a [Parcel], selection: &ParcelSelection) -> Vec<&'a Parcel> {
    let district = selection.district.as_deref().map(normalize_district_name);

    parcels
        .iter()
        .filter(|p| selection.sql_ids.is_empty() || selection.sql_ids.contains(&p.sql))
        .filter(|p| {
            district.as_ref().is_none_or(|wanted| {
                p.district
                    .as_deref()
                    .is_some_and(|d| normalize_district_name(d) == *wanted)
            })
        })
        .filter(|p| {
            selection.zone_types.is_empty()
                || p.zone_type
                    .as_ref()
                    .is_some_and(|z| selection.zone_types.contains(z))
        })
        .collect()
}

/// Centroids of `parcels`, used as proximity references.
#[must_use]
pub fn reference_points<'a>(parcels: impl IntoIterator<Item = &'a Parcel>) -> Vec<Coordinate> {
    parcels.into_iter().map(|p| p.centroid).collect()
}

/// Distinct normalized district names of `parcels`, sorted.
#[must_use]
pub fn districts_of<'a>(parcels: impl IntoIterator<Item = &'a Parcel>) -> Vec<String> {
    parcels
        .into_iter()
        .filter_map(|p| p.district.as_deref())
        .map(normalize_district_name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
