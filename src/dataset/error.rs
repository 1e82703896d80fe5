use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error reading observation file '{path}'")]
    CsvReadIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing error reading observation file '{path}'")]
    CsvReadPolars {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Observation file '{path}' is missing required columns: {missing:?}")]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Observation file '{path}' contains no rows with a valid timestamp")]
    EmptyDataset { path: PathBuf },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
