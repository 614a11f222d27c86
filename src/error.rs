//! Error types returned by every fallible operation in the crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The host has no geolocation provider at all.
    #[error("Geolocation is not supported in this browser")]
    GeolocationUnavailable,

    /// The user refused to share their position.
    #[error("Geolocation permission denied: {0}")]
    GeolocationDenied(String),

    /// The provider was asked for a position but could not deliver one.
    #[error("Geolocation failed: {0}")]
    GeolocationFailed(String),

    #[error("Malformed timezone {input:?}: {reason}")]
    MalformedTimezone { input: String, reason: String },

    #[error("Malformed angle {input:?}: {reason}")]
    MalformedAngle { input: String, reason: String },

    /// A coordinate that is not finite or lies outside its allowed range.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(f64),

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
