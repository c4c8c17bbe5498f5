mod graph;
pub use graph::Graph;

mod controls;
pub use controls::{CountryPicker, YearSlider};
