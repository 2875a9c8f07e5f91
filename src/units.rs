//! Unit conversions applied at the normalization boundary.
//!
//! All functions are pure. Every uniform weather record carries Celsius
//! and metres per second regardless of what the provider sent.

/// Metres per second in one mile per hour.
pub const MPH_TO_MS: f64 = 0.44704;

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Converts to Celsius only when `unit` declares Fahrenheit ("F").
///
/// The unit must come from the response itself; any other value is
/// passed through unchanged.
pub fn temperature_to_celsius(value: f64, unit: &str) -> f64 {
    if unit.trim().eq_ignore_ascii_case("F") {
        fahrenheit_to_celsius(value)
    } else {
        value
    }
}

/// Parses NWS wind text such as `"10 mph"` into metres per second.
///
/// Only the leading numeric token is read and it is always taken as mph.
/// Ranges like `"5 to 10 mph"` therefore yield the lower bound.
///
/// Lenient by contract: empty text or a non-numeric leading token returns
/// `0.0` instead of an error, so one odd period never drops a forecast.
pub fn parse_wind_speed(text: &str) -> f64 {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|mph| mph.is_finite())
        .map(|mph| mph * MPH_TO_MS)
        .unwrap_or(0.0)
}

/// Wraps a compass bearing into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fahrenheit_to_celsius_reference_points() {
        assert!(approx(fahrenheit_to_celsius(32.0), 0.0));
        assert!(approx(fahrenheit_to_celsius(212.0), 100.0));
        assert!(approx(fahrenheit_to_celsius(50.0), 10.0));
        assert!(approx(fahrenheit_to_celsius(-40.0), -40.0));
    }

    #[test]
    fn test_temperature_conversion_depends_on_declared_unit() {
        assert!(approx(temperature_to_celsius(50.0, "F"), 10.0));
        assert!(approx(temperature_to_celsius(50.0, "C"), 50.0));
        assert!(approx(temperature_to_celsius(50.0, ""), 50.0));
    }

    #[test]
    fn test_parse_wind_speed_mph() {
        assert!(approx(parse_wind_speed("10 mph"), 4.4704));
        assert!(approx(parse_wind_speed("0 mph"), 0.0));
        assert!(approx(parse_wind_speed("2.5 mph"), 2.5 * MPH_TO_MS));
        assert!(approx(parse_wind_speed("5 to 10 mph"), 5.0 * MPH_TO_MS));
    }

    #[test]
    fn test_parse_wind_speed_unparseable_is_zero() {
        assert_eq!(parse_wind_speed(""), 0.0);
        assert_eq!(parse_wind_speed("   "), 0.0);
        assert_eq!(parse_wind_speed("calm"), 0.0);
        assert_eq!(parse_wind_speed("mph 10"), 0.0);
        assert_eq!(parse_wind_speed("NaN mph"), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!(approx(normalize_degrees(0.0), 0.0));
        assert!(approx(normalize_degrees(359.0), 359.0));
        assert!(approx(normalize_degrees(360.0), 0.0));
        assert!(approx(normalize_degrees(450.0), 90.0));
        assert!(approx(normalize_degrees(-90.0), 270.0));
    }
}
