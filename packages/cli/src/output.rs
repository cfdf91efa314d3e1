//! Terminal and file output for command results.

use std::io::Write;
use std::path::Path;

use parcel_scout_market::MarketDashboard;
use parcel_scout_proximity::{DistanceResult, NearestByCategory};
use parcel_scout_scoring::{PointsLookup, PointsPolicy, ScoreTable};
use serde::Serialize;

use crate::commands::DistrictRow;

/// Prints `value` as pretty JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters >= 1_000.0 {
        format!("{:.2} km", meters / 1_000.0)
    } else {
        format!("{meters:.0} m")
    }
}

pub fn print_distances(results: &[DistanceResult]) {
    if results.is_empty() {
        println!("No points within the radius.");
        return;
    }

    println!("{:<32} {:<40} DISTANCE", "CATEGORY", "POINT");
    println!("{}", "-".repeat(84));
    for result in results {
        println!(
            "{:<32} {:<40} {}",
            result.category,
            result.point_id,
            format_distance(result.distance_meters)
        );
    }
    println!();
    println!("{} points", results.len());
}

pub fn print_nearest(nearest: &NearestByCategory) {
    if nearest.is_empty() {
        println!("No points within the radius.");
        return;
    }

    println!("{:<32} {:<40} DISTANCE", "CATEGORY", "NEAREST");
    println!("{}", "-".repeat(84));
    for (category, result) in nearest {
        println!(
            "{:<32} {:<40} {}",
            category,
            result.point_id,
            format_distance(result.distance_meters)
        );
    }
}

pub fn print_score_table(table: &ScoreTable) {
    if table.is_empty() {
        println!("Nothing within the radius to score.");
        return;
    }

    println!(
        "{:<32} {:<14} {:>10} {:>8}",
        "CATEGORY", "SOURCE", "DISTANCE", "POINTS"
    );
    println!("{}", "-".repeat(67));
    for entry in &table.entries {
        let marker = if entry.in_lookup { "" } else { " *" };
        println!(
            "{:<32} {:<14} {:>10} {:>8.2}{marker}",
            entry.category,
            entry.source,
            format_distance(entry.distance_meters),
            entry.points
        );
    }
    println!("{}", "-".repeat(67));
    println!("{:<58}{:>8.2}", "TOTAL", table.total_score);

    let unmatched = table.unmatched_categories();
    if !unmatched.is_empty() {
        println!();
        println!("* not in the points lookup: {}", unmatched.join(", "));
    }
}

/// Writes the score table rows to a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_score_csv(table: &ScoreTable, path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for entry in &table.entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    log::info!(
        "Wrote {} score rows to {}",
        table.entries.len(),
        path.display()
    );
    Ok(())
}

pub fn print_dashboard(dashboard: &MarketDashboard) {
    let totals = &dashboard.totals;
    println!("Launched: {}", totals.total_launched);
    println!("Sold:     {}", totals.total_sold);
    println!("Stock:    {}", totals.total_stock);
    println!("VSO:      {}", format_vso(totals.vso_percent));
    println!();

    println!(
        "{:<12} {:<36} {:>8} {:>8} {:>8} {:>8}",
        "RGI", "DEVELOPMENT", "UNITS", "SOLD", "STOCK", "VSO"
    );
    println!("{}", "-".repeat(85));
    for dev in &dashboard.developments {
        println!(
            "{:<12} {:<36} {:>8} {:>8} {:>8} {:>8}",
            dev.rgi,
            dev.development,
            dev.total_units,
            dev.sold_units,
            dev.stock_units,
            format_vso(dev.vso_percent)
        );
    }
}

fn format_vso(vso: Option<f64>) -> String {
    vso.map_or_else(|| "-".to_string(), |v| format!("{v:.2}%"))
}

/// Writes one line per district with its region, `-` when unlisted.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_district_rows(rows: &[DistrictRow], out: &mut impl Write) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No districts match.");
    }

    writeln!(out, "{:<32} REGION", "DISTRICT")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for row in rows {
        let region = row.region.map_or_else(|| "-".to_string(), |r| r.to_string());
        writeln!(out, "{:<32} {region}", row.name)?;
    }
    Ok(())
}

const fn policy_name(policy: &PointsPolicy) -> &'static str {
    match policy {
        PointsPolicy::Flat { .. } => "flat",
        PointsPolicy::Bands { .. } => "bands",
        PointsPolicy::LinearDecay { .. } => "linear_decay",
    }
}

/// Writes the lookup as a table of categories with their policy and the
/// most points each can award.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_lookup_table(lookup: &PointsLookup, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{:<32} {:<14} {:>10}", "CATEGORY", "POLICY", "MAX POINTS")?;
    writeln!(out, "{}", "-".repeat(58))?;
    for (category, policy) in &lookup.categories {
        writeln!(
            out,
            "{:<32} {:<14} {:>10.2}",
            category,
            policy_name(policy),
            policy.max_points()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} categories", lookup.categories.len())
}

/// Writes the lookup as TOML to `out`.
///
/// # Errors
///
/// Returns an error if the lookup cannot be serialized or written.
pub fn write_lookup_toml(
    lookup: &PointsLookup,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = toml::to_string_pretty(lookup)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use parcel_scout_district::Region;
    use parcel_scout_scoring::{ScoreEntry, ScoreSource, parse_lookup};

    use super::*;

    fn written(write: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        write(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn distances_switch_to_kilometers() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1_500.0), "1.50 km");
    }

    #[test]
    fn vso_formatting() {
        assert_eq!(format_vso(Some(42.5)), "42.50%");
        assert_eq!(format_vso(None), "-");
    }

    #[test]
    fn score_csv_has_one_row_per_entry() {
        let table = ScoreTable {
            entries: vec![
                ScoreEntry {
                    category: "Ciclovia".to_string(),
                    source: ScoreSource::Mobility,
                    distance_meters: 120.0,
                    points: 3.0,
                    in_lookup: true,
                },
                ScoreEntry {
                    category: "Padaria".to_string(),
                    source: ScoreSource::Establishment,
                    distance_meters: 80.0,
                    points: 0.0,
                    in_lookup: false,
                },
            ],
            total_score: 3.0,
        };

        let path = std::env::temp_dir().join(format!(
            "parcel_scout_score_{}.csv",
            std::process::id()
        ));
        write_score_csv(&table, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "category,source,distanceMeters,points,inLookup");
        assert_eq!(lines[1], "Ciclovia,mobility,120.0,3.0,true");
        assert_eq!(lines[2], "Padaria,establishment,80.0,0.0,false");
    }

    #[test]
    fn lookup_toml_parses_back() {
        let lookup = parse_lookup(
            "[categories.Hospital]\npolicy = \"flat\"\npoints = 4.0\n",
        )
        .unwrap();
        let mut out = Vec::new();
        write_lookup_toml(&lookup, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(parse_lookup(&text).unwrap(), lookup);
    }

    #[test]
    fn lookup_table_shows_max_points_per_category() {
        let lookup = parse_lookup(
            r#"
            [categories.Hospital]
            policy = "flat"
            points = 4.0

            [categories.Metro]
            policy = "bands"
            bands = [
                { max_distance_meters = 300.0, points = 5.0 },
                { max_distance_meters = 800.0, points = 2.0 },
            ]
            "#,
        )
        .unwrap();

        let text = written(|out| write_lookup_table(&lookup, out).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("CATEGORY"));
        assert!(lines[0].ends_with("MAX POINTS"));
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["Hospital", "flat", "4.00"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), ["Metro", "bands", "5.00"]);
        assert_eq!(lines.last(), Some(&"2 categories"));
    }

    #[test]
    fn district_rows_show_region_or_dash() {
        let rows = vec![
            DistrictRow {
                name: "PINHEIROS".to_string(),
                region: Some(Region::Oeste),
            },
            DistrictRow {
                name: "ATLANTIDA".to_string(),
                region: None,
            },
        ];

        let text = written(|out| write_district_rows(&rows, out).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["PINHEIROS", "OESTE"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), ["ATLANTIDA", "-"]);

        assert_eq!(written(|out| write_district_rows(&[], out).unwrap()), "No districts match.\n");
    }
}
