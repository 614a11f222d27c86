//! Observer location: turning a geolocation result into the values of the location form.
//!
//! The browser owns the asynchronous position request. What comes back, a position or an
//! error code, is handed to this module, which computes the strings for the latitude,
//! longitude and timezone fields. Writing them into the page is left to the caller.

use crate::{
    angle,
    config::FormatConfig,
    error::{self, Error},
    timezone,
};
use derive_try_from_primitive::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A position in decimal degrees, as delivered by a geolocation provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Error codes of the browser Geolocation API (`GeolocationPositionError.code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[repr(u16)]
pub enum GeolocationErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

impl GeolocationErrorCode {
    /// Convert a provider failure into the crate error. Unknown codes count as plain failures.
    pub fn error_from_code(code: u16, message: &str) -> Error {
        match Self::try_from(code) {
            Ok(GeolocationErrorCode::PermissionDenied) => Error::GeolocationDenied(message.to_string()),
            Ok(known) => Error::GeolocationFailed(format!("{:?}: {}", known, message)),
            Err(_) => Error::GeolocationFailed(format!("error code {}: {}", code, message)),
        }
    }
}

/// Anything that can report the current position of the observer.
pub trait GeolocationProvider {
    fn current_position(&self) -> error::Result<Position>;
}

/// A fixed position, e.g. one typed on the command line.
impl GeolocationProvider for Position {
    fn current_position(&self) -> error::Result<Position> {
        Ok(*self)
    }
}

/// Logical identifiers of the location form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Latitude,
    Longitude,
    Timezone,
}

impl Field {
    pub fn id(&self) -> &'static str {
        match self {
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Timezone => "timezone",
        }
    }
}

/// The values to write into the location form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: String,
    pub longitude: String,
    pub timezone: String,
}

impl ObserverLocation {
    pub fn from_position(position: Position, config: &FormatConfig) -> error::Result<Self> {
        let Position { latitude, longitude } = position;
        if !latitude.is_finite() || latitude.abs() > 90. {
            return Err(Error::InvalidCoordinate(latitude));
        }

        Ok(ObserverLocation {
            latitude: angle::degrees_to_dms(latitude, config.dms_precision)?,
            longitude: angle::degrees_to_dms(longitude, config.dms_precision)?,
            timezone: timezone::derive_timezone_offset(longitude)?,
        })
    }

    pub fn fields(&self) -> [(Field, &str); 3] {
        [
            (Field::Latitude, self.latitude.as_str()),
            (Field::Longitude, self.longitude.as_str()),
            (Field::Timezone, self.timezone.as_str()),
        ]
    }
}

/// Ask `provider` for the current position and compute the location form values.
///
/// `None` stands for a host without any geolocation support.
pub fn locate(provider: Option<&dyn GeolocationProvider>, config: &FormatConfig) -> error::Result<ObserverLocation> {
    let provider = provider.ok_or(Error::GeolocationUnavailable)?;
    let position = match provider.current_position() {
        Ok(position) => position,
        Err(e) => {
            tracing::warn!(error = %e, "geolocation failed, manual entry is required");
            return Err(e);
        }
    };

    let location = ObserverLocation::from_position(position, config)?;
    tracing::debug!(
        latitude = position.latitude,
        longitude = position.longitude,
        timezone = %location.timezone,
        "located observer"
    );
    Ok(location)
}
