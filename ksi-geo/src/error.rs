//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum KsiGeoError {
    /// Projection definition could not be turned into an operation.
    #[error("invalid projection definition '{definition}': {reason}")]
    InvalidProjection {
        /// Definition string as given to the projection engine.
        definition: String,
        /// Reason reported by the projection engine.
        reason: String,
    },
    /// The CRS needs a projection engine that is not compiled in.
    #[error("projection support for {0} is not available")]
    Unsupported(String),
}
