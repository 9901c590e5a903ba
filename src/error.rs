use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced to the caller of `RepositoryAnalyzer::analyze`.
/// Everything else is recovered inside the analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Repository path {} does not exist", .path.display())]
    InvalidRepository { path: PathBuf },

    #[error("Repository path {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
}
