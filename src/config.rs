//! Formatting settings shared by the library, the CLI and the browser bindings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Number of fractional-second digits written by the date/time shifter. Extra digits are
/// truncated, not rounded.
pub const SUBSECOND_DIGITS: usize = 3;

/// Largest number of decimals accepted for the seconds field of a DMS string.
pub const MAX_DMS_PRECISION: usize = 9;

/// Environment variable overriding [`FormatConfig::dms_precision`].
pub const DMS_PRECISION_VAR: &str = "AAICLOCK_DMS_PRECISION";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Decimals written after the seconds of a `D:MM:SS.s` string.
    #[serde(default = "default_dms_precision")]
    pub dms_precision: usize,
}

fn default_dms_precision() -> usize {
    4
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            dms_precision: default_dms_precision(),
        }
    }
}

impl FormatConfig {
    /// Build a configuration from the defaults, overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = FormatConfig::default();
        if let Ok(value) = env::var(DMS_PRECISION_VAR) {
            config.dms_precision = value.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{} is not a number: {:?}", DMS_PRECISION_VAR, value))
            })?;
        }
        config.validate()?;
        tracing::debug!(dms_precision = config.dms_precision, "loaded format configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dms_precision > MAX_DMS_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "DMS precision {} exceeds the maximum of {}",
                self.dms_precision, MAX_DMS_PRECISION
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{FormatConfig, MAX_DMS_PRECISION};

    #[test]
    fn test_default_config() {
        let config = FormatConfig::default();
        assert_eq!(config.dms_precision, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_precision() {
        let config = FormatConfig {
            dms_precision: MAX_DMS_PRECISION + 1,
        };
        assert!(config.validate().is_err());
    }
}
