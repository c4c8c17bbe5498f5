//! The two explicit dashboard controls: the year slider driving the map and
//! the multi-country picker driving the filtered line chart. (The third
//! input, map clicks, is wired through the `Graph` component.)

use dioxus::prelude::*;

#[component]
pub fn YearSlider(year_min: i32, year_max: i32, mut selected_year: Signal<i32>) -> Element {
    let current = selected_year();

    rsx! {
        div { class: "control control-year",
            label { r#for: "year-slider", "Map year: {current}" }
            input {
                id: "year-slider",
                r#type: "range",
                min: "{year_min}",
                max: "{year_max}",
                step: "1",
                value: "{current}",
                oninput: move |evt| {
                    if let Ok(year) = evt.value().parse::<i32>() {
                        selected_year.set(year);
                    }
                },
            }
        }
    }
}

#[component]
pub fn CountryPicker(
    countries: Vec<String>,
    mut selected_countries: Signal<Vec<String>>,
) -> Element {
    let selected = selected_countries();
    let available: Vec<String> = countries
        .iter()
        .filter(|country| !selected.contains(country))
        .cloned()
        .collect();

    rsx! {
        div { class: "control control-countries",
            select {
                id: "country-dropdown",
                onchange: move |evt| {
                    let picked = evt.value();
                    if !picked.is_empty() {
                        selected_countries.with_mut(|set| {
                            if !set.contains(&picked) {
                                set.push(picked);
                            }
                        });
                    }
                },
                option { value: "", selected: true, "Select countries..." }
                for country in available.iter() {
                    option { value: "{country}", "{country}" }
                }
            }

            if selected.is_empty() {
                span { class: "control-countries__hint", "No selection: showing every country." }
            } else {
                ul { class: "control-countries__chips",
                    for country in selected.iter() {
                        {render_chip(country.clone(), selected_countries)}
                    }
                }
            }
        }
    }
}

fn render_chip(country: String, mut selected_countries: Signal<Vec<String>>) -> Element {
    let remove_target = country.clone();

    rsx! {
        li { class: "control-countries__chip",
            span { "{country}" }
            button {
                r#type: "button",
                class: "control-countries__remove",
                aria_label: "Remove {country}",
                onclick: move |_| {
                    selected_countries.with_mut(|set| set.retain(|name| name != &remove_target));
                },
                "×"
            }
        }
    }
}
