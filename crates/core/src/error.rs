//! Error types for spatial database queries

use thiserror::Error;

/// Main error type for spatial database operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Query values not set; call set_query_values() before querying")]
    QueryValuesNotSet,

    #[error("Number of query values must be positive")]
    EmptyValueSelection,

    #[error("Could not find value '{name}' in spatial database. Available values: {}", .available.join(", "))]
    ValueNotFound { name: String, available: Vec<String> },

    #[error("Result buffer size mismatch: expected {expected} values, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Insufficient points for {topology} interpolation at ({x}, {y}, {z})")]
    InsufficientPoints {
        topology: &'static str,
        x: f64,
        y: f64,
        z: f64,
    },

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Coordinate system mismatch: {0} vs {1}")]
    CoordSysMismatch(String, String),

    #[error("Spatial database '{0}' is not open")]
    DatabaseClosed(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for spatial database operations
pub type Result<T> = std::result::Result<T, Error>;
