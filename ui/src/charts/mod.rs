mod spec;
pub use spec::{
    Axis, AxisValues, ChartSpec, Layout, Legend, MapCenter, Mapbox, Marker, Title, Trace,
    TraceKind,
};

mod builders;
pub use builders::{choropleth_map, diverging_bar, line_chart, stacked_bar};
