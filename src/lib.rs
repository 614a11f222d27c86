//! Observer coordinate and timezone helpers for astronomy web forms.
//!
//! All operations are pure functions over strings and numbers: they compute the values a
//! form should display and leave writing them to the caller. On `wasm32` the [`wasm`] module
//! exports them to the browser.

#![forbid(unsafe_code)]

pub mod angle;
pub mod config;
pub mod datetime;
pub mod error;
pub mod location;
pub mod parse;
pub mod timezone;
pub mod version;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use angle::{degrees_to_dms, dms_to_degrees, Dms};
pub use config::FormatConfig;
pub use datetime::{
    datetime_to_julian_date, daylight_to_standard, julian_date_to_datetime, shift_date_time,
    standard_time, standard_to_daylight, DateTimeTriple,
};
pub use error::{Error, Result};
pub use location::{locate, Field, GeolocationErrorCode, GeolocationProvider, ObserverLocation, Position};
pub use timezone::{derive_timezone_offset, normalize_timezone, NormalizedTimezone, TimezoneOffset};

#[cfg(test)]
mod test {
    use super::{
        datetime_to_julian_date, daylight_to_standard, degrees_to_dms, derive_timezone_offset,
        dms_to_degrees, julian_date_to_datetime, locate, normalize_timezone, standard_to_daylight,
        FormatConfig, Position,
    };

    /// Walk through what the observation page does: locate the observer, then convert the
    /// reading they typed from daylight saving time to standard time.
    #[test]
    fn test_observation_form_flow() {
        let greenwich = Position {
            latitude: 51.4769,
            longitude: -0.0005,
        };
        let location = locate(Some(&greenwich), &FormatConfig::default()).unwrap();
        assert_eq!(location.latitude, "51:28:36.8400");
        assert_eq!(location.longitude, "-0:00:01.8000");
        assert_eq!(location.timezone, "+00:00");

        let latitude = dms_to_degrees(&location.latitude).unwrap();
        assert!((latitude - 51.4769).abs() < 1e-9);

        let tz = normalize_timezone("1").unwrap();
        let st = daylight_to_standard("2019-06-21", "22:00:00", &tz.offset_string).unwrap();
        assert_eq!((st.date.as_str(), st.time.as_str(), st.timezone.as_str()), ("2019-06-21", "21:00:00.000", "+01:00"));
    }

    #[test]
    fn test_dst_conversions_invert_each_other() {
        for (date, time, tz, canonical) in &[
            ("2019-09-08", "12:34:56.789", "-8", "-08:00"),
            ("2020-02-29", "23:59:59.999", "+5:30", "+05:30"),
            ("2021-01-01", "00:00:00.000", "+00:00", "+00:00"),
        ] {
            let dst = standard_to_daylight(date, time, tz).unwrap();
            let st = daylight_to_standard(&dst.date, &dst.time, &dst.timezone).unwrap();
            assert_eq!(&st.date, date);
            assert_eq!(&st.time, time);
            assert_eq!(&st.timezone, canonical);
        }
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(degrees_to_dms(-33.8688, 2).unwrap(), "-33:52:07.68");
        assert_eq!(derive_timezone_offset(151.2).unwrap(), "+10:00");
        let tz = normalize_timezone("+5:30").unwrap();
        assert_eq!((tz.offset_hours, tz.offset_string.as_str()), (5.5, "+05:30"));
        assert!(normalize_timezone("abc").is_err());

        // J2000.0
        assert_eq!(datetime_to_julian_date("2000-01-01", "12:00:00", "+00:00").unwrap(), 2_451_545.);
        let noon = julian_date_to_datetime(2_451_545., "+5:30").unwrap();
        assert_eq!((noon.date.as_str(), noon.time.as_str()), ("2000-01-01", "17:30:00.000"));
    }
}
