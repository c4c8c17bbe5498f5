//! Plotly mount point. The chart spec is computed in Rust; rendering happens
//! client-side by handing the figure JSON to `Plotly.react`, and map clicks
//! come back over the eval channel as the clicked feature's display name.

use dioxus::prelude::*;

use crate::charts::ChartSpec;

#[component]
pub fn Graph(
    id: String,
    spec: ReadOnlySignal<ChartSpec>,
    #[props(default)] on_feature_click: Option<EventHandler<Option<String>>>,
) -> Element {
    let element_id = id.clone();
    let wants_clicks = on_feature_click.is_some();

    use_effect(move || {
        let payload = spec.read().to_json();
        let script = format!(
            r#"
            const figure = {payload};
            const mount = () => {{
                const el = document.getElementById("{element_id}");
                if (!el) {{ return; }}
                Plotly.react(el, figure.data, figure.layout, {{ responsive: true }});
                if ({wants_clicks}) {{
                    if (el.removeAllListeners) {{ el.removeAllListeners("plotly_click"); }}
                    el.on("plotly_click", (event) => {{
                        const point = event.points && event.points[0];
                        dioxus.send(point && point.text ? point.text : null);
                    }});
                }}
            }};
            if (window.Plotly) {{
                mount();
            }} else {{
                const pending = setInterval(() => {{
                    if (window.Plotly) {{
                        clearInterval(pending);
                        mount();
                    }}
                }}, 50);
            }}
            "#
        );

        let mut eval = document::eval(&script);
        if let Some(handler) = on_feature_click {
            spawn(async move {
                while let Ok(clicked) = eval.recv::<Option<String>>().await {
                    handler.call(clicked);
                }
            });
        }
    });

    rsx! {
        div { id: "{id}", class: "graph" }
    }
}
