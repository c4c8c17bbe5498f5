//! Server-side ingest: the two workbook sheets, the boundary file, and the
//! map-tile token, read once at startup into an immutable [`DashboardData`].

use std::collections::BTreeMap;
use std::str::FromStr;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::model::{
    BoundaryFeature, DashboardData, DiffRecord, EmissionRecord, GasType, GeoMergeReport,
};
use crate::reshape;

/// Workbook holding the panel and difference sheets.
pub const WORKBOOK_PATH: &str = "data/GHGperGas_Cleaned.xlsx";
/// Country boundary polygons with `ADMIN` / `ADM0_A3` properties.
pub const BOUNDARIES_PATH: &str = "data/countries.geojson";
/// Plaintext map-tile provider token.
pub const TOKEN_PATH: &str = ".mapbox_token";

const PANEL_SHEET: &str = "Panel Total ghg";
const DIFF_SHEET: &str = "Difference not panel";

const COL_YEAR: &str = "Year";
const COL_NAME: &str = "ADMIN";
const COL_CODE: &str = "ADM0_A3";
const COL_DIFF: &str = "Diff percent";

static DATASET: OnceCell<DashboardData> = OnceCell::new();

/// The dataset loaded by [`init_from_disk`], if startup succeeded.
pub fn dataset() -> Option<&'static DashboardData> {
    DATASET.get()
}

/// Loads everything from the working directory and seals the dataset cell.
/// Any failure is fatal to startup; the caller aborts the process.
pub fn init_from_disk() -> Result<(), LoadError> {
    let data = load_dashboard_data()?;
    info!(
        records = data.records.len(),
        trend_points = data.trend.len(),
        geometries = data.geo.len(),
        years = %format!("{}..={}", data.year_min, data.year_max),
        "emissions dataset ready"
    );
    DATASET
        .set(data)
        .map_err(|_| LoadError::AlreadyInitialised)
}

fn load_dashboard_data() -> Result<DashboardData, LoadError> {
    let mapbox_token = read_token(TOKEN_PATH)?;

    let mut workbook: Xlsx<_> =
        open_workbook(WORKBOOK_PATH).map_err(LoadError::Workbook)?;

    let panel = sheet(&mut workbook, PANEL_SHEET)?;
    let records = parse_panel_sheet(&panel)?;
    info!(rows = records.len(), sheet = PANEL_SHEET, "panel sheet loaded");

    let diff = sheet(&mut workbook, DIFF_SHEET)?;
    let diffs = parse_diff_sheet(&diff)?;
    info!(rows = diffs.len(), sheet = DIFF_SHEET, "difference sheet loaded");

    let boundaries = read_boundaries(BOUNDARIES_PATH)?;
    info!(features = boundaries.len(), "boundaries loaded");

    let trend = reshape::build_trend(&records);
    let diverging = reshape::build_top_bottom_diff(&diffs, 5);
    let (geo, report) = reshape::build_geo_merge(&records, boundaries);
    log_merge_report(&report);

    let year_min = records.iter().map(|r| r.year).min().unwrap_or(0);
    let year_max = records.iter().map(|r| r.year).max().unwrap_or(0);

    let mut countries: Vec<String> = trend.iter().map(|p| p.country_name.clone()).collect();
    countries.sort();
    countries.dedup();

    Ok(DashboardData {
        records,
        trend,
        diverging,
        geo,
        year_min,
        year_max,
        countries,
        mapbox_token,
    })
}

fn read_token(path: &str) -> Result<String, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
    Ok(raw.trim().to_string())
}

fn sheet(workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>, name: &str) -> Result<Range<Data>, LoadError> {
    workbook
        .worksheet_range(name)
        .map_err(|_| LoadError::MissingSheet(name.to_string()))
}

/// Maps header cell text to column index, trimming whitespace.
fn header_map(range: &Range<Data>) -> BTreeMap<String, usize> {
    range
        .rows()
        .next()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter_map(|(idx, cell)| {
                    let text = cell_text(cell)?;
                    Some((text.trim().to_string(), idx))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn column(
    headers: &BTreeMap<String, usize>,
    sheet: &str,
    name: &str,
) -> Result<usize, LoadError> {
    headers
        .get(name)
        .copied()
        .ok_or_else(|| LoadError::MissingColumn {
            sheet: sheet.to_string(),
            column: name.to_string(),
        })
}

/// Parses the wide panel sheet into long-form records: each source row fans
/// out into one record per gas column holding a numeric value.
fn parse_panel_sheet(range: &Range<Data>) -> Result<Vec<EmissionRecord>, LoadError> {
    let headers = header_map(range);
    let year_col = column(&headers, PANEL_SHEET, COL_YEAR)?;
    let name_col = column(&headers, PANEL_SHEET, COL_NAME)?;
    let code_col = column(&headers, PANEL_SHEET, COL_CODE)?;

    let mut gas_cols = Vec::new();
    for gas in [
        GasType::Co2,
        GasType::N2oEquivalent,
        GasType::Ch4Equivalent,
        GasType::Total,
    ] {
        gas_cols.push((gas, column(&headers, PANEL_SHEET, gas.label())?));
    }

    let mut records = Vec::new();
    for row in range.rows().skip(1) {
        let Some(year) = row.get(year_col).and_then(cell_i32) else {
            continue;
        };
        let Some(country_name) = row.get(name_col).and_then(cell_text) else {
            continue;
        };
        let Some(country_code) = row.get(code_col).and_then(cell_text) else {
            continue;
        };

        for &(gas, col) in &gas_cols {
            if let Some(value) = row.get(col).and_then(cell_f64) {
                records.push(EmissionRecord {
                    year,
                    country_code: country_code.clone(),
                    country_name: country_name.clone(),
                    gas,
                    value,
                });
            }
        }
    }

    if records.is_empty() {
        return Err(LoadError::EmptySheet(PANEL_SHEET.to_string()));
    }
    Ok(records)
}

fn parse_diff_sheet(range: &Range<Data>) -> Result<Vec<DiffRecord>, LoadError> {
    let headers = header_map(range);
    let name_col = column(&headers, DIFF_SHEET, COL_NAME)?;
    let diff_col = column(&headers, DIFF_SHEET, COL_DIFF)?;

    let mut diffs = Vec::new();
    for row in range.rows().skip(1) {
        let Some(country_name) = row.get(name_col).and_then(cell_text) else {
            continue;
        };
        let Some(diff_percent) = row.get(diff_col).and_then(cell_f64) else {
            continue;
        };
        diffs.push(DiffRecord {
            country_name,
            diff_percent,
        });
    }

    if diffs.is_empty() {
        return Err(LoadError::EmptySheet(DIFF_SHEET.to_string()));
    }
    Ok(diffs)
}

fn read_boundaries(path: &str) -> Result<Vec<BoundaryFeature>, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
    let parsed = geojson::GeoJson::from_str(&raw)?;

    let collection = match parsed {
        geojson::GeoJson::FeatureCollection(collection) => collection,
        geojson::GeoJson::Feature(feature) => geojson::FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        },
        geojson::GeoJson::Geometry(_) => return Err(LoadError::EmptyBoundaries),
    };

    let mut boundaries = Vec::new();
    for feature in collection.features {
        let code = feature
            .property(COL_CODE)
            .and_then(|value| value.as_str())
            .map(str::to_string);
        let name = feature
            .property(COL_NAME)
            .and_then(|value| value.as_str())
            .map(str::to_string);
        let Some(geometry) = feature.geometry else {
            continue;
        };
        if let (Some(country_code), Some(country_name)) = (code, name) {
            boundaries.push(BoundaryFeature {
                country_code,
                country_name,
                geometry,
            });
        }
    }

    if boundaries.is_empty() {
        return Err(LoadError::EmptyBoundaries);
    }
    Ok(boundaries)
}

fn log_merge_report(report: &GeoMergeReport) {
    if !report.unmatched_geometries.is_empty() {
        warn!(
            count = report.unmatched_geometries.len(),
            codes = ?report.unmatched_geometries,
            "geometries with no emissions match (kept with null columns)"
        );
    }
    if !report.dropped_codes.is_empty() {
        warn!(
            count = report.dropped_codes.len(),
            codes = ?report.dropped_codes,
            "emission codes with no geometry match (dropped from the map)"
        );
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        _ => None,
    }
}

fn cell_i32(cell: &Data) -> Option<i32> {
    match cell {
        Data::Float(value) => Some(*value as i32),
        Data::Int(value) => Some(*value as i32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel_range() -> Range<Data> {
        let header: Vec<Data> = [
            COL_YEAR,
            COL_NAME,
            COL_CODE,
            GasType::Co2.label(),
            GasType::N2oEquivalent.label(),
            GasType::Ch4Equivalent.label(),
            GasType::Total.label(),
        ]
        .iter()
        .map(|text| Data::String((*text).to_string()))
        .collect();

        let row = vec![
            Data::Float(2020.0),
            Data::String("Canada".to_string()),
            Data::String("CAN".to_string()),
            Data::Float(500.0),
            Data::Float(60.0),
            Data::Float(160.0),
            Data::Float(720.0),
        ];

        let mut range = Range::new((0, 0), (1, 6));
        for (col, cell) in header.into_iter().enumerate() {
            range.set_value((0, col as u32), cell);
        }
        for (col, cell) in row.into_iter().enumerate() {
            range.set_value((1, col as u32), cell);
        }
        range
    }

    #[test]
    fn panel_rows_fan_out_one_record_per_gas_column() {
        let records = parse_panel_sheet(&panel_range()).unwrap();

        assert_eq!(records.len(), 4);
        assert!(records
            .iter()
            .all(|r| r.year == 2020 && r.country_code == "CAN"));
        let total = records.iter().find(|r| r.gas == GasType::Total).unwrap();
        assert_eq!(total.value, 720.0);
    }

    #[test]
    fn missing_gas_column_is_a_load_error() {
        let mut range = Range::new((0, 0), (0, 2));
        range.set_value((0, 0), Data::String(COL_YEAR.to_string()));
        range.set_value((0, 1), Data::String(COL_NAME.to_string()));
        range.set_value((0, 2), Data::String(COL_CODE.to_string()));

        let err = parse_panel_sheet(&range).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }

    #[test]
    fn boundary_features_need_code_name_and_geometry() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"ADMIN": "Canada", "ADM0_A3": "CAN"},
                    "geometry": {"type": "Point", "coordinates": [-106.3, 56.1]}
                },
                {
                    "type": "Feature",
                    "properties": {"ADMIN": "No Geometry"},
                    "geometry": null
                }
            ]
        }"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.geojson");
        std::fs::write(&path, raw).unwrap();

        let boundaries = read_boundaries(path.to_str().unwrap()).unwrap();

        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].country_code, "CAN");
        assert_eq!(boundaries[0].country_name, "Canada");
    }
}
