//! Error types for every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the input table or extracting typed rows.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{column}`")]
    MissingColumn { column: String },
    #[error("row {row}, column `{column}`: cannot read `{value}` as a finite number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("input table has no data rows")]
    Empty,
}

/// Failures while fitting the regression forest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForestError {
    #[error("cannot fit a forest on zero samples")]
    NoSamples,
    #[error("{features} feature rows but {targets} targets")]
    LengthMismatch { features: usize, targets: usize },
    #[error("row {row} has {found} features, expected {expected}")]
    RaggedFeatures {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("n_estimators must be at least 1")]
    NoEstimators,
}

/// Failures while rendering or writing the map document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot serialise map data")]
    Render(#[from] serde_json::Error),
    #[error("cannot write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while loading a JSON configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure of the dashboard pipeline.
#[derive(Debug, Error)]
pub enum FloodError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Forest(#[from] ForestError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = FloodError> = std::result::Result<T, E>;
