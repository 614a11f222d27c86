//! Timezone offsets: derivation from longitude and normalization of free-form offset strings.

use crate::{
    error::{Error, Result},
    parse::{self, Sign},
};
use nom::{
    character::complete::char,
    combinator::{opt, verify},
    error::context,
    sequence::{preceded, tuple},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A fixed offset from UTC, written canonically as `±HH:MM`.
///
/// Hours are not range-checked beyond fitting in two digits; minutes are always below 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneOffset {
    pub sign: Sign,
    pub hours: u8,
    pub minutes: u8,
}

impl TimezoneOffset {
    pub const UTC: TimezoneOffset = TimezoneOffset {
        sign: Sign::Positive,
        hours: 0,
        minutes: 0,
    };

    /// Offset of a whole number of hours east (positive) or west (negative) of UTC.
    pub fn whole_hours(hours: i8) -> Self {
        let sign = if hours < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        TimezoneOffset {
            sign,
            hours: hours.unsigned_abs(),
            minutes: 0,
        }
    }

    /// Parse `(+|-)?H{1,2}(:MM)?`. A missing sign means east of UTC and missing minutes mean
    /// `:00`.
    pub fn parse(text: &str) -> Result<Self> {
        parse::complete(text, timezone_offset).map_err(|e| Error::MalformedTimezone {
            input: text.to_string(),
            reason: parse::describe_error("timezone", e),
        })
    }

    /// The offset in hours; the sign applies to the minutes too, so `-05:30` is `-5.5`.
    pub fn offset_hours(&self) -> f64 {
        self.sign.factor() * (self.hours as f64 + self.minutes as f64 / 60.)
    }

    pub fn offset_seconds(&self) -> i64 {
        let magnitude = self.hours as i64 * 3600 + self.minutes as i64 * 60;
        match self.sign {
            Sign::Positive => magnitude,
            Sign::Negative => -magnitude,
        }
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{:02}:{:02}", self.sign.as_char(), self.hours, self.minutes)
    }
}

impl FromStr for TimezoneOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TimezoneOffset::parse(s)
    }
}

fn timezone_offset(i: parse::Input) -> parse::Result<TimezoneOffset> {
    let (i, (sign, hours, minutes)) = tuple((
        context("Timezone sign", parse::sign),
        context("Timezone hours", parse::digits(1, 2)),
        opt(context(
            "Timezone minutes",
            preceded(char(':'), verify(parse::digits(2, 2), |m: &u32| *m < 60)),
        )),
    ))(i)?;

    let offset = TimezoneOffset {
        sign,
        hours: hours as u8,
        minutes: minutes.unwrap_or(0) as u8,
    };
    Ok((i, offset))
}

/// A timezone in both of the forms the date/time forms consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTimezone {
    pub offset_hours: f64,
    pub offset_string: String,
}

impl From<TimezoneOffset> for NormalizedTimezone {
    fn from(offset: TimezoneOffset) -> Self {
        NormalizedTimezone {
            offset_hours: offset.offset_hours(),
            offset_string: offset.to_string(),
        }
    }
}

/// Put a timezone string such as `3`, `-4`, `+01:00` or `+5:30` in the canonical `±HH:MM` form
/// and compute its offset in hours.
pub fn normalize_timezone(text: &str) -> Result<NormalizedTimezone> {
    let offset = TimezoneOffset::parse(text)?;
    tracing::debug!(input = text, offset = %offset, "normalized timezone");
    Ok(offset.into())
}

/// Guess a whole-hour timezone from a longitude in degrees, formatted `±HH:00`.
///
/// Each 15 degrees east of Greenwich is one hour ahead of UTC. Halves round toward positive
/// infinity, so the result never decreases as the longitude grows. Zones with a fractional
/// hour (India's +05:30 for one) are never produced.
pub fn derive_timezone_offset(longitude: f64) -> Result<String> {
    if !longitude.is_finite() || longitude.abs() > 180. {
        return Err(Error::InvalidCoordinate(longitude));
    }

    let hours = (longitude / 15. + 0.5).floor() as i8;
    let offset = TimezoneOffset::whole_hours(hours);
    tracing::debug!(longitude, offset = %offset, "derived timezone from longitude");
    Ok(offset.to_string())
}
