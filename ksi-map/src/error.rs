//! Error types used by the crate.

use ksi_geo::KsiGeoError;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Problems with single rows or single geometries never end up here, see
/// [`SkipReason`](crate::loader::SkipReason) and [`SmoothingError`](crate::smoother::SmoothingError).
#[derive(Debug, Error)]
pub enum KsiMapError {
    /// A required column is not present in the input header.
    #[error("the input must contain a '{0}' column")]
    MissingColumn(&'static str),
    /// The input was read but no row contained a valid line geometry.
    #[error("no valid LineString geometries found in the dataset")]
    EmptyDataset,
    /// CSV decoding error.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    /// Error reading/writing data to the FS.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Projection could not be created.
    #[error("projection error: {0}")]
    Projection(#[from] KsiGeoError),
    /// Pipeline options are inconsistent.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
