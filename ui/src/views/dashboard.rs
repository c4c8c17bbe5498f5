//! The dashboard page: static narrative plus the four graphs. The three
//! selections each drive exactly one chart; the builders stay pure and the
//! view only bridges events to signal updates.

use dioxus::prelude::*;

use api::model::DashboardData;

use crate::charts::{self, ChartSpec};
use crate::components::{CountryPicker, Graph, YearSlider};
use crate::core::format;

#[component]
pub fn Dashboard() -> Element {
    let dataset = use_server_future(api::fetch_dashboard)?;

    match dataset() {
        Some(Ok(data)) => rsx! {
            DashboardBody { data }
        },
        Some(Err(err)) => rsx! {
            section { class: "page page-dashboard",
                div { class: "dashboard__error",
                    "Couldn't load the emissions dataset: {err}"
                }
            }
        },
        None => rsx! {
            section { class: "page page-dashboard",
                p { class: "dashboard__loading", "Loading emissions data…" }
            }
        },
    }
}

#[component]
fn DashboardBody(data: DashboardData) -> Element {
    let year_min = data.year_min;
    let year_max = data.year_max;

    // The three independent selections. Each is owned by one transition:
    // slider → map, map click → stacked bar, picker → filtered line chart.
    let selected_year = use_signal(|| year_max);
    let mut selected_country = use_signal(|| Option::<String>::None);
    let selected_countries = use_signal(Vec::<String>::new);

    let map_data = data.clone();
    let map_spec = use_memo(move || {
        charts::choropleth_map(&map_data.geo, selected_year(), &map_data.mapbox_token)
    });

    let bar_data = data.clone();
    let bar_spec = use_memo(move || match selected_country() {
        Some(country) => charts::stacked_bar(&bar_data.records, &country),
        None => ChartSpec::empty(),
    });

    let line_data = data.clone();
    let filtered_line_spec =
        use_memo(move || charts::line_chart(&line_data.trend, &selected_countries()));

    // Static figures: no selection feeds them, so they compute once.
    let overview_data = data.clone();
    let overview_spec = use_memo(move || charts::line_chart(&overview_data.trend, &[]));
    let diverging_data = data.clone();
    let diverging_spec = use_memo(move || charts::diverging_bar(&diverging_data.diverging));

    let latest_total: f64 = data
        .trend
        .iter()
        .filter(|point| point.year == year_max)
        .map(|point| point.total_emissions)
        .sum();
    let latest_total_label = format::format_emissions(latest_total);

    rsx! {
        section { class: "page page-dashboard",
            header { class: "dashboard__masthead",
                h1 { "Visualizing the Fight Against Climate Change" }
                p { class: "dashboard__byline",
                    "Global greenhouse-gas emissions, {year_min}–{year_max} · {latest_total_label} emitted in {year_max}"
                }
            }

            p {
                "Greenhouse gases are the primary driver of climate change: burning fossil \
                 fuels, deforestation, and industrial activity release gases that trap heat \
                 and push global temperatures upward. Curbing those emissions starts with \
                 tracking them, country by country and year by year."
            }

            section { class: "dashboard__section",
                h2 { "The global trend" }
                Graph { id: "line-chart-all", spec: overview_spec }
                p {
                    "Every country's total emissions over time, largest emitters first. The \
                     overall trajectory keeps rising; to untangle individual countries, \
                     filter the chart below."
                }
            }

            section { class: "dashboard__section",
                h2 { "Trends, filtered" }
                CountryPicker {
                    countries: data.countries.clone(),
                    selected_countries,
                }
                Graph { id: "line-chart", spec: filtered_line_spec }
            }

            section { class: "dashboard__section",
                h2 { "Movers since the Paris Agreement" }
                p {
                    "The 2015 Paris Agreement committed its signatories to holding warming \
                     below 2 °C. If that effort is working, countries with shrinking \
                     emissions should outweigh those still growing. These are the five \
                     largest increases and five largest decreases in total emissions since \
                     the 2015 base year."
                }
                Graph { id: "diverging-bar-chart", spec: diverging_spec }
            }

            section { class: "dashboard__section",
                h2 { "The gas giants" }
                p {
                    "The map shades each country by its total emissions in the selected \
                     year. Click a country to break its emissions down by gas: the mix of \
                     carbon dioxide, methane, and nitrous oxide points at which industries \
                     drive a country's footprint."
                }
                div { class: "dashboard__map-row",
                    Graph {
                        id: "choropleth-map",
                        spec: map_spec,
                        on_feature_click: move |clicked: Option<String>| {
                            selected_country.set(clicked);
                        },
                    }
                    Graph { id: "stacked-bar-chart", spec: bar_spec }
                }
                YearSlider { year_min, year_max, selected_year }
            }

            section { class: "dashboard__section",
                h2 { "Were the Paris goals achieved?" }
                p {
                    "Over this window most countries' emissions kept rising, so the goals \
                     can't be called met. But policy effects lag; what these charts give is \
                     a clear view of where reductions are and aren't happening, and that is \
                     where acceleration has to start."
                }
            }
        }
    }
}
