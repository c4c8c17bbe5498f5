//! Core data model for the emissions dashboard.
//!
//! Everything here is loaded or derived once at server startup and is
//! immutable afterwards; the client receives a serialized [`DashboardData`]
//! and recomputes charts from it locally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The gas dimension of the panel sheet. `Total` rows carry the precomputed
/// sum of the three component gases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GasType {
    Co2,
    N2oEquivalent,
    Ch4Equivalent,
    Total,
}

impl GasType {
    /// The three component gases, in the stacking order the dashboard uses.
    pub const COMPONENTS: [GasType; 3] = [
        GasType::Co2,
        GasType::N2oEquivalent,
        GasType::Ch4Equivalent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GasType::Co2 => "Annual CO2 emissions",
            GasType::N2oEquivalent => "Annual nitrous oxide emissions in CO2 equivalents",
            GasType::Ch4Equivalent => "Annual methane emissions in CO2 equivalents",
            GasType::Total => "Total GHG emitted",
        }
    }
}

/// One (year, country, gas) observation from the panel sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub year: i32,
    pub country_code: String,
    pub country_name: String,
    pub gas: GasType,
    pub value: f64,
}

/// Total emissions for one country in one year, aggregated from the
/// `Total` rows of the panel sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub country_name: String,
    pub total_emissions: f64,
}

/// Percent change of total emissions between the base year and the latest
/// year, straight from the difference sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub country_name: String,
    pub diff_percent: f64,
}

/// Sign partitions of the k-smallest and k-largest percent changes.
///
/// The partitions are disjoint by construction and their combined size never
/// exceeds 2k. Both are empty when the source has fewer than two records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DivergingSubset {
    /// Non-negative changes, sorted descending.
    pub positive: Vec<DiffRecord>,
    /// Negative changes, sorted ascending (most negative first).
    pub negative: Vec<DiffRecord>,
}

impl DivergingSubset {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }
}

/// One boundary geometry with its per-year emissions columns. Years the left
/// join found no emissions row for stay `None` and render as null on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCountry {
    pub country_code: String,
    pub country_name: String,
    pub geometry: geojson::Geometry,
    pub emissions: BTreeMap<i32, Option<f64>>,
}

/// A raw boundary feature as parsed from the boundaries file, before the
/// emissions join.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub country_code: String,
    pub country_name: String,
    pub geometry: geojson::Geometry,
}

/// Join observability: which side of the geometry/emissions merge lost rows.
/// Mismatches are logged, never fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoMergeReport {
    /// Geometry codes with no emissions match (kept, with null columns).
    pub unmatched_geometries: Vec<String>,
    /// Emission codes with no geometry match (dropped from the map).
    pub dropped_codes: Vec<String>,
}

/// The full payload handed to the client once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub records: Vec<EmissionRecord>,
    pub trend: Vec<TrendPoint>,
    pub diverging: DivergingSubset,
    pub geo: Vec<GeoCountry>,
    pub year_min: i32,
    pub year_max: i32,
    /// Unique country names from the trend, sorted, for the picker.
    pub countries: Vec<String>,
    pub mapbox_token: String,
}
