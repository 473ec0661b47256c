#![deny(unsafe_code)]

use std::path::PathBuf;

use polars::prelude::PolarsError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("table {table} is missing required column {column}")]
    MissingColumn { table: String, column: String },

    #[error("stored rule {position} of smart group {group_id} is corrupt: {source}")]
    CorruptRule {
        group_id: String,
        position: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("query failed: {0}")]
    Polars(#[from] PolarsError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
