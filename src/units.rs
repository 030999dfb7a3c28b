//! Temperature unit conversion for the Ecobee wire encoding.
//!
//! The service represents temperatures as integer tenths of a degree
//! Fahrenheit (e.g. 72.0°F is sent as 720).

/// Convert the service's tenths-of-a-degree integer to degrees Fahrenheit.
pub fn service_units_to_fahrenheit(raw: i64) -> f64 {
    raw as f64 / 10.0
}

/// Convert degrees Fahrenheit to the service's tenths-of-a-degree integer,
/// rounding to the nearest tenth. Whole-degree inputs round-trip exactly.
pub fn fahrenheit_to_service_units(deg_f: f64) -> i64 {
    (deg_f * 10.0).round() as i64
}
