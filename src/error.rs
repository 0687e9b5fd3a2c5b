//! Error types for the anvil application.
//!
//! This module defines a single error enum covering every failure mode in the
//! application, from NetCDF reads to image encoding.

use thiserror::Error;

/// The main error type for anvil operations.
#[derive(Error, Debug)]
pub enum AnvilError {
    /// NetCDF file operation errors
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Grid and mask dimensions disagree
    #[error("Shape mismatch: grid is {grid_rows}x{grid_cols}, mask is {mask_rows}x{mask_cols}")]
    ShapeMismatch {
        grid_rows: usize,
        grid_cols: usize,
        mask_rows: usize,
        mask_cols: usize,
    },

    /// Palette name not in the built-in set
    #[error("Unknown palette: {name}")]
    UnknownPalette { name: String },

    /// Invalid request parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Timestamp does not parse as YYYYMMDDHHMM
    #[error("Invalid timestamp: {value} (expected YYYYMMDDHHMM)")]
    InvalidTimestamp { value: String },

    /// A frame file exists but lacks an expected field
    #[error("Field missing from frame: {name}")]
    FieldMissing { name: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Image encoding errors
    #[error("Image encoding error: {message}")]
    ImageEncoding { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

/// Convenience type alias for Results with AnvilError
pub type Result<T> = std::result::Result<T, AnvilError>;
