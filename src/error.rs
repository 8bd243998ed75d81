//! Error types for pdistr

use thiserror::Error;

/// Result type alias using pdistr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or computing pairwise distances
#[derive(Error, Debug)]
pub enum Error {
    /// Input or output shape is unusable
    #[error("Invalid shape: {reason}")]
    InvalidShape {
        /// What was wrong with the shape
        reason: String,
    },

    /// The platform capability query returned nothing
    #[error("Platform unavailable: no platform information")]
    PlatformUnavailable,

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A serialized parameter block could not be decoded
    #[error("Invalid tiling record: {reason}")]
    InvalidRecord {
        /// Reason the record was rejected
        reason: String,
    },
}

impl Error {
    /// Create an invalid shape error
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
