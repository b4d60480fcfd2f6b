use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    /// Bin folders and stats files must pair up one-to-one
    #[error("Number of bin folders ({0}) must match number of stats files ({1})")]
    ConfigurationMismatch(usize, usize),
    #[error("Stats file not found: {0}")]
    MissingReport(PathBuf),
    #[error("Failed to read stats file {0}")]
    ReportRead(PathBuf, #[source] std::io::Error),
    #[error("Failed to write {0}")]
    Output(PathBuf, #[source] std::io::Error),
}
