// File: crates/airviz-core/src/error.rs
// Summary: Error types for dataset loading and chart views.

use std::fmt;

use thiserror::Error;

/// Failure to turn uploaded text into records. Always surfaced to the user;
/// never downgraded to an empty dataset.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("the uploaded file is empty")]
    EmptyInput,
    #[error("no header row found")]
    MissingHeader,
    #[error("header has no `{0}` column")]
    MissingDateColumn(String),
    #[error("the file contains a header but no data rows")]
    NoDataRows,
    #[error("no row has a date matching `{0}`")]
    NoDatedRows(String),
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a view could not find a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Empty,
    Pending,
    Failed,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadStatus::Empty => "no file loaded",
            LoadStatus::Pending => "file is still loading",
            LoadStatus::Failed => "last load failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum AirVizError {
    #[error("empty or invalid file: {0}")]
    Parse(#[from] ParseError),
    #[error("no active dataset ({0})")]
    MissingDataset(LoadStatus),
}

pub type Result<T, E = AirVizError> = std::result::Result<T, E>;
