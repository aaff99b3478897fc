//! Error types for visualization requests

use crate::data::DataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    /// No handler is registered for the requested kind
    #[error("Unsupported visualization type: {0}")]
    UnsupportedType(String),

    /// Rows or config do not meet the handler's requirements
    #[error("Data validation failed: {0}")]
    Validation(String),

    /// No visualization was added under this id
    #[error("Visualization '{0}' not found")]
    UnknownVisualization(String),

    /// The source dataset could not be resolved
    #[error(transparent)]
    Data(#[from] DataError),
}

pub type VizResult<T> = Result<T, VizError>;
