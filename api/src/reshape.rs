//! One-time reshaping of the loaded tables into the dashboard's three
//! analytical views: the year×country trend, the top/bottom percent-change
//! subset, and the geometry-merged wide table behind the choropleth.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{
    BoundaryFeature, DiffRecord, DivergingSubset, EmissionRecord, GasType, GeoCountry,
    GeoMergeReport, TrendPoint,
};

/// Aggregates `Total` records by (year, country), summing values. Output
/// order is deterministic (year, then name) but consumers re-sort as needed.
pub fn build_trend(records: &[EmissionRecord]) -> Vec<TrendPoint> {
    let mut totals: BTreeMap<(i32, &str), f64> = BTreeMap::new();
    for record in records {
        if record.gas == GasType::Total {
            *totals
                .entry((record.year, record.country_name.as_str()))
                .or_insert(0.0) += record.value;
        }
    }

    totals
        .into_iter()
        .map(|((year, name), total_emissions)| TrendPoint {
            year,
            country_name: name.to_string(),
            total_emissions,
        })
        .collect()
}

/// Selects the k smallest and k largest percent changes, then partitions the
/// selection by sign. The selection is stable: ties keep source row order.
///
/// When fewer than 2k records exist, k is clamped to half the record count so
/// the two selections never overlap; the result is empty only when fewer than
/// two records exist.
pub fn build_top_bottom_diff(diffs: &[DiffRecord], k: usize) -> DivergingSubset {
    let k = k.min(diffs.len() / 2);
    if k == 0 {
        return DivergingSubset::default();
    }

    let mut order: Vec<usize> = (0..diffs.len()).collect();
    order.sort_by(|&a, &b| diffs[a].diff_percent.total_cmp(&diffs[b].diff_percent));

    let lowest = &order[..k];
    // Tied maxima pick first source occurrences, same as the lowest side: a
    // stable descending re-sort of the remainder keeps tied groups in source
    // order while staying disjoint from the lowest selection.
    let mut rest = order[k..].to_vec();
    rest.sort_by(|&a, &b| diffs[b].diff_percent.total_cmp(&diffs[a].diff_percent));
    let highest = &rest[..k];

    let mut positive: Vec<DiffRecord> = Vec::new();
    let mut negative: Vec<DiffRecord> = Vec::new();
    for &idx in lowest.iter().chain(highest.iter()) {
        let record = diffs[idx].clone();
        if record.diff_percent >= 0.0 {
            positive.push(record);
        } else {
            negative.push(record);
        }
    }

    positive.sort_by(|a, b| b.diff_percent.total_cmp(&a.diff_percent));
    negative.sort_by(|a, b| a.diff_percent.total_cmp(&b.diff_percent));

    DivergingSubset { positive, negative }
}

/// Pivots `Total` records into one column per year, keyed by country code.
/// Returns the full year set alongside so unmatched rows still get columns.
pub fn pivot_total_by_year(
    records: &[EmissionRecord],
) -> (BTreeSet<i32>, HashMap<String, BTreeMap<i32, f64>>) {
    let mut years = BTreeSet::new();
    let mut wide: HashMap<String, BTreeMap<i32, f64>> = HashMap::new();

    for record in records {
        if record.gas != GasType::Total {
            continue;
        }
        years.insert(record.year);
        *wide
            .entry(record.country_code.clone())
            .or_default()
            .entry(record.year)
            .or_insert(0.0) += record.value;
    }

    (years, wide)
}

/// Left-joins the pivoted emissions table onto the boundary geometries by
/// country code. Geometry drives the join: every boundary survives (with
/// null columns when unmatched) and emission codes without a boundary are
/// dropped. Both mismatch sets come back in the report.
pub fn build_geo_merge(
    records: &[EmissionRecord],
    boundaries: Vec<BoundaryFeature>,
) -> (Vec<GeoCountry>, GeoMergeReport) {
    let (years, mut wide) = pivot_total_by_year(records);
    let mut report = GeoMergeReport::default();

    let geo = boundaries
        .into_iter()
        .map(|boundary| {
            let matched = wide.remove(&boundary.country_code);
            if matched.is_none() {
                report.unmatched_geometries.push(boundary.country_code.clone());
            }
            let emissions = years
                .iter()
                .map(|&year| {
                    let value = matched.as_ref().and_then(|columns| columns.get(&year)).copied();
                    (year, value)
                })
                .collect();

            GeoCountry {
                country_code: boundary.country_code,
                country_name: boundary.country_name,
                geometry: boundary.geometry,
                emissions,
            }
        })
        .collect();

    report.dropped_codes = wide.into_keys().collect();
    report.dropped_codes.sort();

    (geo, report)
}

/// Melts the non-Total gas columns for one country back into long form: one
/// `(gas, year-sorted series)` per component gas with at least one value.
/// This is the stacked-bar input; pivoting and melting round-trip exactly.
pub fn gas_series(
    records: &[EmissionRecord],
    country_name: &str,
) -> Vec<(GasType, Vec<(i32, f64)>)> {
    GasType::COMPONENTS
        .iter()
        .filter_map(|&gas| {
            let mut series: Vec<(i32, f64)> = records
                .iter()
                .filter(|record| record.gas == gas && record.country_name == country_name)
                .map(|record| (record.year, record.value))
                .collect();
            if series.is_empty() {
                return None;
            }
            series.sort_by_key(|&(year, _)| year);
            Some((gas, series))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, code: &str, name: &str, gas: GasType, value: f64) -> EmissionRecord {
        EmissionRecord {
            year,
            country_code: code.to_string(),
            country_name: name.to_string(),
            gas,
            value,
        }
    }

    fn diff(name: &str, pct: f64) -> DiffRecord {
        DiffRecord {
            country_name: name.to_string(),
            diff_percent: pct,
        }
    }

    fn point_geometry(lon: f64, lat: f64) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Point(vec![lon, lat]))
    }

    #[test]
    fn trend_sums_total_rows_per_year_and_country() {
        let records = vec![
            record(2019, "USA", "United States", GasType::Total, 4800.0),
            record(2019, "USA", "United States", GasType::Total, 200.0),
            record(2019, "USA", "United States", GasType::Co2, 9999.0),
            record(2020, "CAN", "Canada", GasType::Total, 720.0),
        ];

        let trend = build_trend(&records);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].country_name, "United States");
        assert_eq!(trend[0].total_emissions, 5000.0);
        assert_eq!(trend[1].year, 2020);
        assert_eq!(trend[1].total_emissions, 720.0);
    }

    #[test]
    fn top_bottom_diff_partitions_are_disjoint_and_bounded() {
        let diffs: Vec<DiffRecord> = (0..12)
            .map(|i| diff(&format!("c{i}"), f64::from(i) - 6.0))
            .collect();

        let subset = build_top_bottom_diff(&diffs, 5);

        assert_eq!(subset.len(), 10);
        for p in &subset.positive {
            assert!(p.diff_percent >= 0.0);
            assert!(!subset.negative.contains(p));
        }
        // positive descending, negative ascending
        assert!(subset
            .positive
            .windows(2)
            .all(|w| w[0].diff_percent >= w[1].diff_percent));
        assert!(subset
            .negative
            .windows(2)
            .all(|w| w[0].diff_percent <= w[1].diff_percent));
    }

    #[test]
    fn top_bottom_diff_clamps_k_on_short_input() {
        let diffs = vec![diff("a", -1.0), diff("b", 0.5), diff("c", 2.0)];

        let subset = build_top_bottom_diff(&diffs, 5);

        assert_eq!(subset.len(), 2);
        assert_eq!(subset.negative[0].country_name, "a");
        assert_eq!(subset.positive[0].country_name, "c");
    }

    #[test]
    fn top_bottom_diff_is_empty_below_two_records() {
        assert!(build_top_bottom_diff(&[], 5).is_empty());
        assert!(build_top_bottom_diff(&[diff("only", 1.0)], 5).is_empty());
    }

    #[test]
    fn top_bottom_diff_breaks_ties_by_source_order() {
        let diffs = vec![
            diff("first", 1.0),
            diff("second", 1.0),
            diff("third", 1.0),
            diff("fourth", 1.0),
        ];

        let subset = build_top_bottom_diff(&diffs, 1);

        // "first" is the smallest; the largest is the earliest row not
        // already taken by the lowest side.
        let names: Vec<&str> = subset
            .positive
            .iter()
            .map(|r| r.country_name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn tied_maxima_keep_the_first_source_row() {
        let diffs = vec![
            diff("shrinking", -1.0),
            diff("early", 2.0),
            diff("late", 2.0),
        ];

        let subset = build_top_bottom_diff(&diffs, 1);

        assert_eq!(subset.positive.len(), 1);
        assert_eq!(subset.positive[0].country_name, "early");
        assert_eq!(subset.negative[0].country_name, "shrinking");
    }

    #[test]
    fn geo_merge_keeps_unmatched_geometry_with_null_columns() {
        let records = vec![
            record(2019, "USA", "United States", GasType::Total, 5000.0),
            record(2020, "USA", "United States", GasType::Total, 5100.0),
            record(2019, "ATL", "Atlantis", GasType::Total, 1.0),
        ];
        let boundaries = vec![
            BoundaryFeature {
                country_code: "USA".to_string(),
                country_name: "United States".to_string(),
                geometry: point_geometry(-95.7, 37.0),
            },
            BoundaryFeature {
                country_code: "CAN".to_string(),
                country_name: "Canada".to_string(),
                geometry: point_geometry(-106.3, 56.1),
            },
        ];

        let (geo, report) = build_geo_merge(&records, boundaries);

        assert_eq!(geo.len(), 2);
        assert_eq!(geo[0].emissions[&2019], Some(5000.0));
        assert_eq!(geo[0].emissions[&2020], Some(5100.0));
        // Canada has every year column, all null.
        assert_eq!(geo[1].emissions.len(), 2);
        assert!(geo[1].emissions.values().all(Option::is_none));

        assert_eq!(report.unmatched_geometries, vec!["CAN".to_string()]);
        assert_eq!(report.dropped_codes, vec!["ATL".to_string()]);
    }

    #[test]
    fn pivot_then_melt_round_trips_single_country_triples() {
        let original = vec![
            record(2019, "USA", "United States", GasType::Co2, 4000.0),
            record(2019, "USA", "United States", GasType::Ch4Equivalent, 600.0),
            record(2020, "USA", "United States", GasType::Co2, 4100.0),
            record(2020, "USA", "United States", GasType::N2oEquivalent, 310.0),
            record(2020, "USA", "United States", GasType::Ch4Equivalent, 590.0),
        ];

        let melted = gas_series(&original, "United States");

        let mut triples: Vec<(i32, GasType, f64)> = melted
            .iter()
            .flat_map(|(gas, series)| series.iter().map(|&(year, value)| (year, *gas, value)))
            .collect();
        triples.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut expected: Vec<(i32, GasType, f64)> = original
            .iter()
            .map(|r| (r.year, r.gas, r.value))
            .collect();
        expected.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        assert_eq!(triples, expected);
    }

    #[test]
    fn gas_series_for_unknown_country_is_empty() {
        let records = vec![record(2019, "USA", "United States", GasType::Co2, 4000.0)];
        assert!(gas_series(&records, "Cook Islands").is_empty());
    }
}
