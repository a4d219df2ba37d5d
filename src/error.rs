//! Error types for wallpaper rendering and prayer-time acquisition

use thiserror::Error;

/// Result type alias for wallpaper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring data, rendering or exporting
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure or non-2xx response from the prayer-time source
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Fetch did not complete within the configured bound
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The source answered, but with a non-success status code in the payload
    #[error("Prayer-time source returned code {code}: {status}")]
    SourceStatus { code: i64, status: String },

    /// Payload could not be interpreted (bad date, missing timing field)
    #[error("Malformed payload: {0}")]
    DataFormatError(String),

    /// A strict location lookup failed
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Failed to rasterise a surface
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode or write an exported image
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from the data source side (network, status or
    /// payload shape). All of these are recovered by the fallback generator.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Error::NetworkError(_)
                | Error::Timeout(_)
                | Error::SourceStatus { .. }
                | Error::DataFormatError(_)
        )
    }
}
