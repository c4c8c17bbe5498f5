//! Loader failures. Any of these aborts server startup; there is no retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook has no sheet named {0:?}")]
    MissingSheet(String),

    #[error("sheet {sheet:?} has no column named {column:?}")]
    MissingColumn { sheet: String, column: String },

    #[error("sheet {0:?} contains no data rows")]
    EmptySheet(String),

    #[error("failed to parse boundaries: {0}")]
    Geo(#[from] geojson::Error),

    #[error("boundaries file contains no features")]
    EmptyBoundaries,

    #[error("emissions dataset was initialised twice")]
    AlreadyInitialised,
}

impl LoadError {
    pub fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
