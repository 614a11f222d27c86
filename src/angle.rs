//! Conversions between decimal degrees and degrees:minutes:seconds strings.

use crate::{
    config::MAX_DMS_PRECISION,
    error::{Error, Result},
    parse::{self, Sign},
};
use nom::{
    character::complete::char,
    combinator::opt,
    error::context,
    sequence::{preceded, tuple},
};
use serde::Serialize;
use std::fmt;

/// An angle split into whole degrees, whole minutes and seconds.
///
/// Only built by [`Dms::from_degrees`], so `degrees <= 180`, `minutes < 60` and `seconds < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dms {
    sign: Sign,
    degrees: u32,
    minutes: u32,
    seconds: f64,
    /// Decimals written after the seconds by `Display`.
    precision: usize,
}

impl Dms {
    /// Split decimal degrees into degrees, minutes and seconds, with the seconds rounded to
    /// `precision` decimals.
    ///
    /// The rounding happens once, on the whole angle expressed in units of the last seconds
    /// digit. Minutes and seconds are then taken from that integer, so a value such as
    /// `10.9999999` becomes `11:00:00` rather than `10:59:60`.
    ///
    /// Angles outside [-180, 180] are not coordinates and are rejected.
    pub fn from_degrees(degrees: f64, precision: usize) -> Result<Self> {
        if !degrees.is_finite() || degrees.abs() > 180. {
            return Err(Error::InvalidCoordinate(degrees));
        }
        if precision > MAX_DMS_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "DMS precision {} exceeds the maximum of {}",
                precision, MAX_DMS_PRECISION
            )));
        }

        let scale = 10u64.pow(precision as u32);
        let units_per_minute = 60 * scale;
        let units_per_degree = 60 * units_per_minute;

        let units = (degrees.abs() * 3600. * scale as f64).round() as u64;
        let whole_degrees = units / units_per_degree;
        let remainder = units % units_per_degree;
        let minutes = remainder / units_per_minute;
        let second_units = remainder % units_per_minute;

        // Angles that round to zero are written without a sign
        let sign = if degrees < 0. && units > 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };

        Ok(Dms {
            sign,
            degrees: whole_degrees as u32,
            minutes: minutes as u32,
            seconds: second_units as f64 / scale as f64,
            precision,
        })
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn degrees(&self) -> u32 {
        self.degrees
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Convert back to signed decimal degrees.
    pub fn to_degrees(&self) -> f64 {
        self.sign.factor() * degrees_to_decimal(self.degrees as f64, self.minutes as f64, self.seconds)
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.sign == Sign::Negative {
            write!(f, "-")?;
        }
        // Seconds keep two integer digits: "07.68", or "07" without decimals
        let width = if self.precision == 0 {
            2
        } else {
            3 + self.precision
        };
        write!(
            f,
            "{}:{:02}:{:0width$.prec$}",
            self.degrees,
            self.minutes,
            self.seconds,
            width = width,
            prec = self.precision
        )
    }
}

/// Format decimal degrees as `D:MM:SS.s`, with `precision` decimals on the seconds.
///
/// The degrees are truncated toward zero and keep the sign of the input, so `-33.8688` becomes
/// `-33:52:07.68` at two decimals and `-0.5` becomes `-0:30:00.00`.
pub fn degrees_to_dms(degrees: f64, precision: usize) -> Result<String> {
    let dms = Dms::from_degrees(degrees, precision)?;
    tracing::debug!(degrees, precision, dms = %dms, "formatted angle");
    Ok(dms.to_string())
}

/// Convert latitude and longitude coordinates from degrees/minutes/seconds to decimal.
pub fn degrees_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60. + seconds / 3600.
}

/// Parse `D`, `D:M` or `D:M:S` into signed decimal degrees.
///
/// Every part may carry decimals. A sign is only allowed on the degrees and applies to the
/// whole angle, so `-33:52:07.68` is `-(33 + 52/60 + 7.68/3600)`.
pub fn dms_to_degrees(text: &str) -> Result<f64> {
    let (sign, degrees, minutes, seconds) =
        parse::complete(text, dms).map_err(|e| Error::MalformedAngle {
            input: text.to_string(),
            reason: parse::describe_error("angle", e),
        })?;

    let minutes = minutes.unwrap_or(0.);
    let seconds = seconds.unwrap_or(0.);
    if minutes >= 60. || seconds >= 60. {
        return Err(Error::MalformedAngle {
            input: text.to_string(),
            reason: "minutes and seconds must be less than 60".to_string(),
        });
    }

    let result = sign.factor() * degrees_to_decimal(degrees, minutes, seconds);
    tracing::debug!(input = text, degrees = result, "parsed angle");
    Ok(result)
}

fn dms(i: parse::Input) -> parse::Result<(Sign, f64, Option<f64>, Option<f64>)> {
    tuple((
        context("Angle sign", parse::sign),
        context("Degrees", parse::unsigned_decimal),
        opt(field("Minutes")),
        opt(field("Seconds")),
    ))(i)
}

/// A `:` followed by an unsigned decimal number.
fn field<'a>(name: &'static str) -> impl FnMut(parse::Input<'a>) -> parse::Result<'a, f64> {
    context(name, preceded(char(':'), parse::unsigned_decimal))
}
