//! The four chart builders. Each is a pure function of a reshaped view plus
//! the current selection; the reactive layer re-invokes them on input events
//! and never mutates their inputs.

use std::collections::BTreeMap;

use api::model::{DivergingSubset, EmissionRecord, GeoCountry, TrendPoint};
use api::reshape::gas_series;

use crate::core::format;

use super::spec::{Axis, AxisValues, ChartSpec, Layout, Legend, MapCenter, Mapbox, Title, Trace};

const MAP_STYLE: &str = "carto-positron";
const MAP_CENTER: MapCenter = MapCenter {
    lat: 37.0902,
    lon: -95.7129,
};
const MAP_ZOOM: f64 = 1.0;

/// Colors each boundary by its `selected_year` emissions column. Years with
/// no column (including any year outside the data range) shade as null.
pub fn choropleth_map(geo: &[GeoCountry], selected_year: i32, mapbox_token: &str) -> ChartSpec {
    let features = geo
        .iter()
        .map(|country| geojson::Feature {
            bbox: None,
            geometry: Some(country.geometry.clone()),
            id: Some(geojson::feature::Id::String(country.country_code.clone())),
            properties: None,
            foreign_members: None,
        })
        .collect();
    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let locations = geo.iter().map(|c| c.country_code.clone()).collect();
    let names = geo.iter().map(|c| c.country_name.clone()).collect();
    let z = geo
        .iter()
        .map(|c| c.emissions.get(&selected_year).copied().flatten())
        .collect();

    let layout = Layout {
        mapbox: Some(Mapbox {
            style: MAP_STYLE.to_string(),
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            accesstoken: if mapbox_token.is_empty() {
                None
            } else {
                Some(mapbox_token.to_string())
            },
        }),
        ..Layout::titled(format!(
            "Choropleth Map of Total GHG Emissions per Country in {selected_year}"
        ))
    };

    ChartSpec {
        data: vec![Trace::choropleth_mapbox(collection, locations, z).text(names)],
        layout,
    }
}

/// Gas composition over time for one country, stacked by gas type. A country
/// matching zero records yields an empty figure, not an error.
pub fn stacked_bar(records: &[EmissionRecord], selected_country: &str) -> ChartSpec {
    let series = gas_series(records, selected_country);
    if series.is_empty() {
        return ChartSpec::empty();
    }

    let data = series
        .into_iter()
        .map(|(gas, points)| {
            let years = points.iter().map(|&(year, _)| f64::from(year)).collect();
            let values = points.iter().map(|&(_, value)| value).collect();
            Trace::bar()
                .name(gas.label())
                .x(AxisValues::Numbers(years))
                .y(AxisValues::Numbers(values))
        })
        .collect();

    let layout = Layout {
        barmode: Some("stack".to_string()),
        width: Some(750),
        xaxis: Some(Axis {
            title: Some(Title {
                text: "Year".to_string(),
            }),
            ..Axis::default()
        }),
        yaxis: Some(Axis {
            title: Some(Title {
                text: "Emissions".to_string(),
            }),
            ..Axis::default()
        }),
        legend: Some(Legend {
            orientation: Some("h".to_string()),
            x: Some(1.0),
            y: Some(-0.5),
            xanchor: Some("right".to_string()),
            yanchor: Some("bottom".to_string()),
        }),
        ..Layout::titled(format!("GHG Emissions for {selected_country}"))
    };

    ChartSpec { data, layout }
}

/// Two horizontal bar series around zero: non-negative percent changes
/// descending in red, negative ascending (most negative first) in green.
pub fn diverging_bar(subset: &DivergingSubset) -> ChartSpec {
    let positive = Trace::bar()
        .name("Positive percent difference")
        .horizontal()
        .color("red")
        .x(AxisValues::Numbers(
            subset.positive.iter().map(|r| r.diff_percent).collect(),
        ))
        .y(AxisValues::Labels(
            subset
                .positive
                .iter()
                .map(|r| r.country_name.clone())
                .collect(),
        ))
        .text(
            subset
                .positive
                .iter()
                .map(|r| format::format_percent(r.diff_percent))
                .collect(),
        );

    let negative = Trace::bar()
        .name("Negative percent difference")
        .horizontal()
        .color("green")
        .x(AxisValues::Numbers(
            subset.negative.iter().map(|r| r.diff_percent).collect(),
        ))
        .y(AxisValues::Labels(
            subset
                .negative
                .iter()
                .map(|r| r.country_name.clone())
                .collect(),
        ))
        .text(
            subset
                .negative
                .iter()
                .map(|r| format::format_percent(r.diff_percent))
                .collect(),
        );

    let layout = Layout {
        barmode: Some("overlay".to_string()),
        bargap: Some(0.2),
        bargroupgap: Some(0.1),
        xaxis: Some(Axis {
            tickformat: Some("%".to_string()),
            range: Some([-2.0, 2.0]),
            dtick: Some(1.0),
            ..Axis::default()
        }),
        yaxis: Some(Axis {
            automargin: Some(true),
            ..Axis::default()
        }),
        ..Layout::titled("Largest percent changes in total GHG emissions since 2015")
    };

    ChartSpec {
        data: vec![positive, negative],
        layout,
    }
}

/// Per-country trend lines. An empty selection plots every country. Series
/// are ordered by cumulative emissions descending, name ascending on ties.
pub fn line_chart(trend: &[TrendPoint], selected_countries: &[String]) -> ChartSpec {
    let mut by_country: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
    for point in trend {
        if !selected_countries.is_empty()
            && !selected_countries.iter().any(|name| name == &point.country_name)
        {
            continue;
        }
        by_country
            .entry(point.country_name.as_str())
            .or_default()
            .push((point.year, point.total_emissions));
    }

    let mut ordered: Vec<(&str, Vec<(i32, f64)>)> = by_country.into_iter().collect();
    for (_, points) in &mut ordered {
        points.sort_by_key(|&(year, _)| year);
    }
    // BTreeMap iteration already sorts by name, so this stable sort leaves
    // equal cumulative totals in name order.
    ordered.sort_by(|a, b| {
        let total_a: f64 = a.1.iter().map(|&(_, value)| value).sum();
        let total_b: f64 = b.1.iter().map(|&(_, value)| value).sum();
        total_b.total_cmp(&total_a)
    });

    let data = ordered
        .into_iter()
        .map(|(name, points)| {
            let years = points.iter().map(|&(year, _)| f64::from(year)).collect();
            let values = points.iter().map(|&(_, value)| value).collect();
            Trace::scatter()
                .name(name)
                .mode("lines+markers")
                .x(AxisValues::Numbers(years))
                .y(AxisValues::Numbers(values))
        })
        .collect();

    let layout = Layout {
        xaxis: Some(Axis {
            title: Some(Title {
                text: "Year".to_string(),
            }),
            ..Axis::default()
        }),
        yaxis: Some(Axis {
            title: Some(Title {
                text: "Total GHG emitted".to_string(),
            }),
            ..Axis::default()
        }),
        ..Layout::titled("Trend of Total GHG Emitted per Country")
    };

    ChartSpec { data, layout }
}
