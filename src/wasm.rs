//! WebAssembly bindings for the `aaiclock` crate.
//!
//! Every export returns plain values or serde-serialized objects; the page's JavaScript writes
//! them into its form fields. Errors come back as strings suitable for an alert.

use crate::{
    angle,
    config::FormatConfig,
    datetime,
    error::Error,
    location::{GeolocationErrorCode, ObserverLocation, Position},
    timezone,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    match JsValue::from_serde(value) {
        Ok(v) => Ok(v),
        Err(_) => Err(JsValue::from_str("Unable to convert result to JSON!")),
    }
}

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Format decimal degrees as `D:MM:SS.s`. `precision` defaults to four decimals.
#[wasm_bindgen]
pub fn degrees_to_dms(degrees: f64, precision: Option<u32>) -> Result<String, JsValue> {
    let precision = precision
        .map(|p| p as usize)
        .unwrap_or(FormatConfig::default().dms_precision);
    angle::degrees_to_dms(degrees, precision).map_err(js_error)
}

/// Parse `D[:M[:S]]` into decimal degrees.
#[wasm_bindgen]
pub fn dms_to_degrees(text: &str) -> Result<f64, JsValue> {
    angle::dms_to_degrees(text).map_err(js_error)
}

#[wasm_bindgen]
pub fn derive_timezone_offset(longitude: f64) -> Result<String, JsValue> {
    timezone::derive_timezone_offset(longitude).map_err(js_error)
}

/// Returns `{offset_hours, offset_string}`.
#[wasm_bindgen]
pub fn normalize_timezone(text: &str) -> Result<JsValue, JsValue> {
    let tz = timezone::normalize_timezone(text).map_err(js_error)?;
    to_js(&tz)
}

/// Returns `{date, time, timezone}`.
#[wasm_bindgen]
pub fn shift_date_time(date: &str, time: &str, timezone: &str, delta_seconds: f64) -> Result<JsValue, JsValue> {
    let triple = datetime::shift_date_time(date, time, timezone, delta_seconds).map_err(js_error)?;
    to_js(&triple)
}

#[wasm_bindgen]
pub fn daylight_to_standard(date: &str, time: &str, timezone: &str) -> Result<JsValue, JsValue> {
    let triple = datetime::daylight_to_standard(date, time, timezone).map_err(js_error)?;
    to_js(&triple)
}

#[wasm_bindgen]
pub fn standard_to_daylight(date: &str, time: &str, timezone: &str) -> Result<JsValue, JsValue> {
    let triple = datetime::standard_to_daylight(date, time, timezone).map_err(js_error)?;
    to_js(&triple)
}

#[wasm_bindgen]
pub fn standard_time(date: &str, time: &str, timezone: &str, is_dst: bool) -> Result<JsValue, JsValue> {
    let triple = datetime::standard_time(date, time, timezone, is_dst).map_err(js_error)?;
    to_js(&triple)
}

/// Julian date of a local reading.
#[wasm_bindgen]
pub fn datetime_to_julian_date(date: &str, time: &str, timezone: &str) -> Result<f64, JsValue> {
    datetime::datetime_to_julian_date(date, time, timezone).map_err(js_error)
}

/// Returns `{date, time, timezone}` for a Julian date, read in `timezone`.
#[wasm_bindgen]
pub fn julian_date_to_datetime(julian_date: f64, timezone: &str) -> Result<JsValue, JsValue> {
    let triple = datetime::julian_date_to_datetime(julian_date, timezone).map_err(js_error)?;
    to_js(&triple)
}

/// Success continuation of `navigator.geolocation.getCurrentPosition`: returns
/// `{latitude, longitude, timezone}` strings for the location form.
#[wasm_bindgen]
pub fn observer_location(latitude: f64, longitude: f64) -> Result<JsValue, JsValue> {
    let position = Position { latitude, longitude };
    let location = ObserverLocation::from_position(position, &FormatConfig::default()).map_err(js_error)?;
    to_js(&location)
}

/// Error continuation of `navigator.geolocation.getCurrentPosition`: returns the message to
/// show the user.
#[wasm_bindgen]
pub fn geolocation_failure(code: u16, message: &str) -> String {
    let e = GeolocationErrorCode::error_from_code(code, message);
    format!("{}\nManual entry is required at this time.", e)
}

/// Message to show when the browser has no `navigator.geolocation`.
#[wasm_bindgen]
pub fn geolocation_unavailable() -> String {
    Error::GeolocationUnavailable.to_string()
}
