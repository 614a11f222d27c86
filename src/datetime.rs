//! Shifting a local wall-clock reading, including daylight-saving conversions.
//!
//! A reading is a date string, a time string and a timezone string, as they appear in the
//! observation form. The reading is turned into a UTC instant by removing the timezone offset
//! once, shifted, and turned back into wall-clock time in the same timezone.

use crate::{
    config::SUBSECOND_DIGITS,
    error::{Error, Result},
    parse,
    timezone::TimezoneOffset,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use nom::{
    character::complete::char,
    combinator::opt,
    error::context,
    sequence::{preceded, tuple},
};
use serde::{Deserialize, Serialize};

/// Seconds between daylight saving time and standard time.
pub const DST_SHIFT_SECONDS: f64 = 3600.;

/// Julian date of 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;

const MILLISECONDS_PER_DAY: f64 = 86_400_000.;

/// A local reading as the form fields hold it: `YYYY-MM-DD`, `HH:MM:SS.fff` and `±HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeTriple {
    pub date: String,
    pub time: String,
    pub timezone: String,
}

/// A parsed local reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateTime {
    pub datetime: NaiveDateTime,
    pub offset: TimezoneOffset,
}

impl LocalDateTime {
    pub fn parse(date: &str, time: &str, timezone: &str) -> Result<Self> {
        let offset = TimezoneOffset::parse(timezone)?;
        let date = parse_date(date)?;
        let time = parse_time(time)?;
        Ok(LocalDateTime {
            datetime: NaiveDateTime::new(date, time),
            offset,
        })
    }

    /// The UTC instant of this reading.
    pub fn to_utc(&self) -> Result<NaiveDateTime> {
        self.datetime
            .checked_sub_signed(Duration::seconds(self.offset.offset_seconds()))
            .ok_or_else(|| Error::InvalidDateTime(format!("{} is out of range", self.datetime)))
    }

    /// The wall-clock reading of the UTC instant `utc` at `offset`.
    pub fn from_utc(utc: NaiveDateTime, offset: TimezoneOffset) -> Result<Self> {
        let datetime = utc
            .checked_add_signed(Duration::seconds(offset.offset_seconds()))
            .ok_or_else(|| Error::InvalidDateTime(format!("{} is out of range", utc)))?;
        Ok(LocalDateTime { datetime, offset })
    }

    /// Move the reading by `delta_seconds`, rounded to the millisecond. The timezone stays put.
    pub fn shift(&self, delta_seconds: f64) -> Result<Self> {
        let delta = milliseconds(delta_seconds * 1000.)
            .ok_or_else(|| Error::InvalidDateTime(format!("time shift {}s is out of range", delta_seconds)))?;
        let utc = self
            .to_utc()?
            .checked_add_signed(delta)
            .ok_or_else(|| {
                Error::InvalidDateTime(format!("shifting {} by {}s overflows", self.datetime, delta_seconds))
            })?;
        LocalDateTime::from_utc(utc, self.offset)
    }

    /// Julian date of the UTC instant of this reading, at millisecond resolution.
    pub fn to_julian_date(&self) -> Result<f64> {
        let since_epoch = self.to_utc()?.signed_duration_since(unix_epoch());
        Ok(since_epoch.num_milliseconds() as f64 / MILLISECONDS_PER_DAY + UNIX_EPOCH_JULIAN_DATE)
    }

    /// The wall-clock reading at `offset` of the instant with Julian date `julian_date`.
    pub fn from_julian_date(julian_date: f64, offset: TimezoneOffset) -> Result<Self> {
        let out_of_range = || Error::InvalidDateTime(format!("Julian date {} is out of range", julian_date));
        let since_epoch = milliseconds((julian_date - UNIX_EPOCH_JULIAN_DATE) * MILLISECONDS_PER_DAY)
            .ok_or_else(out_of_range)?;
        let utc = unix_epoch().checked_add_signed(since_epoch).ok_or_else(out_of_range)?;
        LocalDateTime::from_utc(utc, offset)
    }

    pub fn to_triple(&self) -> DateTimeTriple {
        let time_format = format!("%H:%M:%S%.{}f", SUBSECOND_DIGITS);
        DateTimeTriple {
            date: self.datetime.format("%Y-%m-%d").to_string(),
            time: self.datetime.format(&time_format).to_string(),
            timezone: self.offset.to_string(),
        }
    }
}

/// Round `ms` to a whole number of milliseconds. `None` for values that are not finite or do
/// not fit in a `Duration`.
fn milliseconds(ms: f64) -> Option<Duration> {
    let ms = ms.round();
    if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(Duration::milliseconds(ms as i64))
}

fn unix_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Parse `YYYY-M[M]-D[D]` and check that the day exists in the proleptic Gregorian calendar.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let (year, month, day) = parse::complete(text, date).map_err(|e| {
        Error::InvalidDateTime(format!("{:?}: {}", text, parse::describe_error("date", e)))
    })?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| Error::InvalidDateTime(format!("{:?} is not a calendar date", text)))
}

/// Parse `H[H]:M[M][:S[S][.f...]]`. Fractional seconds keep nanosecond resolution.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    let (hour, minute, seconds) = parse::complete(text, time).map_err(|e| {
        Error::InvalidDateTime(format!("{:?}: {}", text, parse::describe_error("time", e)))
    })?;
    let (second, nanos) = seconds.unwrap_or((0, None));

    // Leap seconds are not accepted, so the seconds field stays below 60
    if second >= 60 {
        return Err(Error::InvalidDateTime(format!("{:?} has more than 59 seconds", text)));
    }
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos.unwrap_or(0))
        .ok_or_else(|| Error::InvalidDateTime(format!("{:?} is not a time of day", text)))
}

fn date(i: parse::Input) -> parse::Result<(u32, u32, u32)> {
    tuple((
        context("Year", parse::digits(4, 4)),
        context("Month", preceded(char('-'), parse::digits(1, 2))),
        context("Day", preceded(char('-'), parse::digits(1, 2))),
    ))(i)
}

fn time(i: parse::Input) -> parse::Result<(u32, u32, Option<(u32, Option<u32>)>)> {
    tuple((
        context("Hour", parse::digits(1, 2)),
        context("Minute", preceded(char(':'), parse::digits(1, 2))),
        opt(context(
            "Seconds",
            preceded(char(':'), tuple((parse::digits(1, 2), opt(parse::fraction_nanos)))),
        )),
    ))(i)
}

/// Add `delta_seconds` to a local reading and return the new reading in the same timezone.
///
/// The timezone string may be raw (`-8`) or canonical (`-08:00`); the returned one is canonical.
/// The time comes back as `HH:MM:SS.fff`, truncated to the millisecond.
pub fn shift_date_time(date: &str, time: &str, timezone: &str, delta_seconds: f64) -> Result<DateTimeTriple> {
    let reading = LocalDateTime::parse(date, time, timezone)?;
    let shifted = reading.shift(delta_seconds)?.to_triple();
    tracing::debug!(
        date,
        time,
        timezone,
        delta_seconds,
        new_date = %shifted.date,
        new_time = %shifted.time,
        "shifted local reading"
    );
    Ok(shifted)
}

/// Convert a daylight saving time reading to standard time (one hour back).
pub fn daylight_to_standard(date: &str, time: &str, timezone: &str) -> Result<DateTimeTriple> {
    shift_date_time(date, time, timezone, -DST_SHIFT_SECONDS)
}

/// Convert a standard time reading to daylight saving time (one hour forward).
pub fn standard_to_daylight(date: &str, time: &str, timezone: &str) -> Result<DateTimeTriple> {
    shift_date_time(date, time, timezone, DST_SHIFT_SECONDS)
}

/// Express a reading in standard time. Readings already in standard time are only
/// reformatted: `HH:MM:SS.fff` and a canonical timezone.
pub fn standard_time(date: &str, time: &str, timezone: &str, is_dst: bool) -> Result<DateTimeTriple> {
    if is_dst {
        return daylight_to_standard(date, time, timezone);
    }

    Ok(LocalDateTime::parse(date, time, timezone)?.to_triple())
}

/// Julian date of a local reading.
pub fn datetime_to_julian_date(date: &str, time: &str, timezone: &str) -> Result<f64> {
    let julian_date = LocalDateTime::parse(date, time, timezone)?.to_julian_date()?;
    tracing::debug!(date, time, timezone, julian_date, "converted reading to Julian date");
    Ok(julian_date)
}

/// Local reading in `timezone` of a Julian date.
pub fn julian_date_to_datetime(julian_date: f64, timezone: &str) -> Result<DateTimeTriple> {
    let offset = TimezoneOffset::parse(timezone)?;
    let triple = LocalDateTime::from_julian_date(julian_date, offset)?.to_triple();
    tracing::debug!(julian_date, date = %triple.date, time = %triple.time, "converted Julian date to reading");
    Ok(triple)
}

#[cfg(test)]
mod test {
    use super::{
        datetime_to_julian_date, daylight_to_standard, julian_date_to_datetime, parse_date,
        parse_time, shift_date_time, standard_time, standard_to_daylight, DateTimeTriple,
        LocalDateTime,
    };
    use crate::{error::Error, timezone::TimezoneOffset};

    fn triple(date: &str, time: &str, timezone: &str) -> DateTimeTriple {
        DateTimeTriple {
            date: date.to_string(),
            time: time.to_string(),
            timezone: timezone.to_string(),
        }
    }

    #[test]
    fn test_shift_by_zero_is_identity() {
        assert_eq!(
            shift_date_time("2019-09-08", "12:34:56.789", "-8", 0.).unwrap(),
            triple("2019-09-08", "12:34:56.789", "-08:00")
        );
        assert_eq!(
            shift_date_time("2019-09-08", "12:34:56.789", "+05:30", 0.).unwrap(),
            triple("2019-09-08", "12:34:56.789", "+05:30")
        );
    }

    #[test]
    fn test_shift_crosses_midnight_and_years() {
        assert_eq!(
            shift_date_time("2019-12-31", "23:30:00", "+01:00", 3600.).unwrap(),
            triple("2020-01-01", "00:30:00.000", "+01:00")
        );
        assert_eq!(
            shift_date_time("2020-03-01", "00:15:00", "-5", -1800.).unwrap(),
            triple("2020-02-29", "23:45:00.000", "-05:00")
        );
    }

    #[test]
    fn test_shift_applies_offset_once() {
        // A fractional timezone must not leak into the wall-clock result
        assert_eq!(
            shift_date_time("2019-09-08", "12:00:00", "+5:30", 60.).unwrap(),
            triple("2019-09-08", "12:01:00.000", "+05:30")
        );
        assert_eq!(
            shift_date_time("2019-09-08", "12:00:00", "-09:30", -90.5).unwrap(),
            triple("2019-09-08", "11:58:29.500", "-09:30")
        );
    }

    #[test]
    fn test_shift_truncates_to_milliseconds() {
        assert_eq!(
            shift_date_time("2019-09-08", "12:34:56.7899", "0", 0.).unwrap().time,
            "12:34:56.789"
        );
        assert_eq!(shift_date_time("2019-09-08", "1:2", "0", 0.).unwrap().time, "01:02:00.000");
    }

    #[test]
    fn test_dst_round_trip() {
        let there = standard_to_daylight("2019-03-10", "01:30:00.250", "-8").unwrap();
        assert_eq!(there, triple("2019-03-10", "02:30:00.250", "-08:00"));
        let back = daylight_to_standard(&there.date, &there.time, &there.timezone).unwrap();
        assert_eq!(back, triple("2019-03-10", "01:30:00.250", "-08:00"));
    }

    #[test]
    fn test_standard_time() {
        assert_eq!(
            standard_time("2019-07-04", "00:20:00", "+2", true).unwrap(),
            triple("2019-07-03", "23:20:00.000", "+02:00")
        );
        assert_eq!(
            standard_time("2019-07-04", "00:20:00", "+2", false).unwrap(),
            triple("2019-07-04", "00:20:00.000", "+02:00")
        );
        assert!(matches!(
            standard_time("2019-07-04", "00:20:00", "two", false),
            Err(Error::MalformedTimezone { .. })
        ));
    }

    #[test]
    fn test_invalid_readings() {
        for (date, time) in &[
            ("2019-02-30", "12:00:00"),
            ("2019-13-01", "12:00:00"),
            ("19-01-01", "12:00:00"),
            ("2019-01-01", "24:00:00"),
            ("2019-01-01", "12:60:00"),
            ("2019-01-01", "12:00:60"),
            ("2019-01-01", "noon"),
            ("", "12:00:00"),
        ] {
            match shift_date_time(date, time, "+00:00", 0.) {
                Err(Error::InvalidDateTime(_)) => {}
                other => panic!("expected InvalidDateTime for {} {}, got {:?}", date, time, other),
            }
        }

        assert!(matches!(
            shift_date_time("2019-01-01", "12:00:00", "+00:00", f64::NAN),
            Err(Error::InvalidDateTime(_))
        ));
        assert!(matches!(
            shift_date_time("2019-01-01", "12:00:00", "abc", 0.),
            Err(Error::MalformedTimezone { .. })
        ));
    }

    #[test]
    fn test_parse_reading() {
        let reading = LocalDateTime::parse("2019-9-8", "12:34:56.789", "-08:00").unwrap();
        assert_eq!(reading.offset.offset_seconds(), -8 * 3600);
        assert_eq!(
            reading.to_utc().unwrap(),
            parse_date("2019-09-08")
                .unwrap()
                .and_time(parse_time("20:34:56.789").unwrap())
        );
    }

    #[test]
    fn test_shift_rejects_out_of_range_delta() {
        for delta in &[1e300, -1e300, 9.3e15, -9.3e15, 1e17, -1e17] {
            match shift_date_time("2019-01-01", "12:00:00", "+00:00", *delta) {
                Err(Error::InvalidDateTime(_)) => {}
                other => panic!("expected InvalidDateTime for {}, got {:?}", delta, other),
            }
        }
    }

    #[test]
    fn test_julian_date() {
        assert_eq!(datetime_to_julian_date("2000-01-01", "12:00:00", "+00:00").unwrap(), 2_451_545.);
        assert_eq!(datetime_to_julian_date("1970-01-01", "00:00", "0").unwrap(), 2_440_587.5);
        // Noon in Sydney is 02:00 UTC
        let sydney_noon = datetime_to_julian_date("2000-01-01", "12:00:00", "+10:00").unwrap();
        assert!((sydney_noon - (2_451_544.5 + 2. / 24.)).abs() < 1e-9);

        assert_eq!(
            julian_date_to_datetime(2_451_545., "+00:00").unwrap(),
            triple("2000-01-01", "12:00:00.000", "+00:00")
        );
        assert_eq!(
            julian_date_to_datetime(2_451_545., "-5").unwrap(),
            triple("2000-01-01", "07:00:00.000", "-05:00")
        );
    }

    #[test]
    fn test_julian_date_round_trip() {
        let reading = LocalDateTime::parse("2019-09-08", "12:34:56.789", "+05:30").unwrap();
        let julian_date = reading.to_julian_date().unwrap();
        let back = LocalDateTime::from_julian_date(julian_date, reading.offset).unwrap();
        assert_eq!(back.to_triple(), reading.to_triple());
    }

    #[test]
    fn test_julian_date_rejects_bad_input() {
        for julian_date in &[f64::NAN, f64::INFINITY, 1e300, -1e300, 1e15] {
            assert!(matches!(
                LocalDateTime::from_julian_date(*julian_date, TimezoneOffset::UTC),
                Err(Error::InvalidDateTime(_))
            ));
        }
        assert!(matches!(julian_date_to_datetime(2_451_545., "abc"), Err(Error::MalformedTimezone { .. })));
    }
}
