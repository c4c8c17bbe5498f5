//! Shared UI crate for GHG Atlas. Chart specs, the pure chart builders, and
//! the dashboard view live here.

pub mod charts;
pub mod components;
pub mod core;
pub mod views;
