//! Unified error hierarchy for climbrs
//!
//! The calculation core is total and never fails. Errors only arise at the
//! edges: building profiles from untrusted points, importing tracks, reading
//! and writing files.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all climbrs operations
#[derive(Debug, Error)]
pub enum ClimbRsError {
    /// Elevation profile construction errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Track import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Persisted state errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Elevation profile validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    /// A profile needs at least two points to form a segment
    #[error("Profile needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    /// The first point must sit at distance zero
    #[error("Profile must start at distance 0, starts at {distance_km} km")]
    NonZeroStart { distance_km: f64 },

    /// Distances must strictly increase
    #[error("Profile distance does not increase at point {index}")]
    NotMonotonic { index: usize },

    /// NaN or infinite values
    #[error("Non-finite value at point {index}")]
    NonFinite { index: usize },
}

/// Track import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File could not be read
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No importer handles this file type
    #[error("Unsupported route file: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// File could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// GPX parsing failed
    #[error("GPX parse error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    /// No tracks in the file
    #[error("No tracks found in GPX file")]
    NoTracks,

    /// Track points carry no elevation data
    #[error("Track has no elevation data")]
    MissingElevation,

    /// Track too short to build a profile
    #[error("Track too short: {reason}")]
    TooShort { reason: String },

    /// Resulting profile was rejected
    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),
}

/// Persisted state errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing store could not be read or written
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Snapshot could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot decoded but is not a state object
    #[error("Malformed snapshot: {reason}")]
    Malformed { reason: String },

    /// Snapshot version newer than this build understands
    #[error("Unsupported snapshot version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Report export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Unsupported format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart rendering failed
    #[error("Chart rendering failed: {reason}")]
    Chart { reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for climbrs operations
pub type Result<T> = std::result::Result<T, ClimbRsError>;

impl ClimbRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClimbRsError::Import(ImportError::FileNotFound { .. }) => ErrorSeverity::Warning,
            ClimbRsError::Validation(_) => ErrorSeverity::Warning,
            ClimbRsError::Profile(_) => ErrorSeverity::Warning,
            ClimbRsError::Storage(_) => ErrorSeverity::Warning,
            ClimbRsError::Configuration(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ClimbRsError::Import(ImportError::FileNotFound { path }) => {
                format!("Could not find route file: {}", path.display())
            }
            ClimbRsError::Import(ImportError::MissingElevation) => {
                "The route file has no elevation data, so the climb cannot be profiled."
                    .to_string()
            }
            ClimbRsError::Profile(ProfileError::TooFewPoints { .. }) => {
                "An elevation profile needs at least two points.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
