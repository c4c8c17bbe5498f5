//! Typed chart specifications serializing to the Plotly figure JSON schema.
//!
//! A [`ChartSpec`] is the boundary artifact between the pure chart builders
//! and the rendering layer: the `Graph` component hands its JSON to
//! `Plotly.react` on the client. Only the slice of the schema the dashboard
//! uses is modelled; unknown options stay out rather than going through an
//! untyped map.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    /// A figure with no traces. The defined result for "nothing selected".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Total number of plotted points across all traces.
    pub fn point_count(&self) -> usize {
        self.data.iter().map(Trace::point_count).sum()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"data":[],"layout":{}}"#.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceKind {
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "scatter")]
    Scatter,
    #[serde(rename = "choroplethmapbox")]
    ChoroplethMapbox,
}

/// Either axis of a trace: numeric for years and magnitudes, labels for
/// category axes such as country names on the diverging chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValues {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Numbers(values) => values.len(),
            AxisValues::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisValues>,
    /// Color values for map traces; `None` entries render as unshaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Option<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<geojson::FeatureCollection>,
    /// Hover/click labels; the map click handler reports these back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

impl Trace {
    fn new(kind: TraceKind) -> Self {
        Self {
            kind,
            name: None,
            x: None,
            y: None,
            z: None,
            locations: None,
            geojson: None,
            text: None,
            mode: None,
            orientation: None,
            marker: None,
        }
    }

    pub fn bar() -> Self {
        Self::new(TraceKind::Bar)
    }

    pub fn scatter() -> Self {
        Self::new(TraceKind::Scatter)
    }

    pub fn choropleth_mapbox(
        geojson: geojson::FeatureCollection,
        locations: Vec<String>,
        z: Vec<Option<f64>>,
    ) -> Self {
        let mut trace = Self::new(TraceKind::ChoroplethMapbox);
        trace.geojson = Some(geojson);
        trace.locations = Some(locations);
        trace.z = Some(z);
        trace
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn x(mut self, values: AxisValues) -> Self {
        self.x = Some(values);
        self
    }

    pub fn y(mut self, values: AxisValues) -> Self {
        self.y = Some(values);
        self
    }

    pub fn text(mut self, labels: Vec<String>) -> Self {
        self.text = Some(labels);
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Some("h".to_string());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.marker = Some(Marker {
            color: color.into(),
        });
        self
    }

    pub fn point_count(&self) -> usize {
        if let Some(z) = &self.z {
            return z.len();
        }
        match (&self.x, &self.y) {
            (Some(x), _) => x.len(),
            (None, Some(y)) => y.len(),
            (None, None) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargroupgap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
}

impl Layout {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Some(Title { text: text.into() }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automargin: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapbox {
    pub style: String,
    pub center: MapCenter,
    pub zoom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}
