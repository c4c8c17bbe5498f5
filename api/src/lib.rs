//! Backend crate for GHG Atlas: the emissions data model, the reshaping
//! pipeline, and the server function that ships the prepared dataset to the
//! client. File ingest lives behind the `server` feature.

use dioxus::prelude::*;

pub mod model;
pub mod reshape;

#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod loader;

use model::DashboardData;

/// Returns the dataset loaded at server startup. The web entry point aborts
/// before serving if the load failed, so an uninitialised cell here means the
/// server function was wired up without the startup bootstrap.
#[server]
pub async fn fetch_dashboard() -> Result<DashboardData, ServerFnError> {
    loader::dataset()
        .cloned()
        .ok_or_else(|| ServerFnError::new("emissions dataset is not initialised"))
}
