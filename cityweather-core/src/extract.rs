//! Turning a raw OpenWeather response body into a [`WeatherReading`].
//!
//! Two strategies are available:
//! - [`ResponseParser::Json`] deserializes the body with `serde_json`.
//! - [`ResponseParser::Scan`] looks for `"key":` substrings and reads the
//!   value that follows. It assumes well-formed, single-line JSON and does not
//!   cope with escaped quotes, nested objects or repeated keys.

use std::{fmt, str::FromStr};

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::{NOT_AVAILABLE, WeatherReading, kelvin_to_celsius},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseParser {
    #[default]
    Json,
    Scan,
}

impl ResponseParser {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseParser::Json => "json",
            ResponseParser::Scan => "scan",
        }
    }

    pub fn parse(&self, city: &str, raw: &str) -> Result<WeatherReading> {
        debug!(parser = self.as_str(), bytes = raw.len(), "parsing weather response");
        match self {
            ResponseParser::Json => parse_reading(city, raw),
            ResponseParser::Scan => scan_reading(city, raw),
        }
    }
}

impl fmt::Display for ResponseParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResponseParser {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "json" => Ok(ResponseParser::Json),
            "scan" => Ok(ResponseParser::Scan),
            _ => Err(WeatherError::config(format!(
                "Unknown parser '{value}'. Supported parsers: json, scan."
            ))),
        }
    }
}

impl FromStr for ResponseParser {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        ResponseParser::try_from(s)
    }
}

/// Returns the value that follows `"key":` in `raw`, or `"N/A"`.
///
/// A value starting with a double quote runs to the next double quote;
/// anything else runs to the next comma. A missing terminator means the value
/// runs to the end of `raw`.
pub fn extract_field<'a>(raw: &'a str, key: &str) -> &'a str {
    let needle = format!("\"{key}\":");
    let Some(pos) = raw.find(&needle) else {
        return NOT_AVAILABLE;
    };
    let rest = &raw[pos + needle.len()..];

    match rest.strip_prefix('"') {
        Some(quoted) => {
            let end = quoted.find('"').unwrap_or(quoted.len());
            &quoted[..end]
        }
        None => {
            let end = rest.find(',').unwrap_or(rest.len());
            &rest[..end]
        }
    }
}

/// Builds a reading with [`extract_field`].
///
/// A missing or non-numeric `temp` means the city was not found, whatever the
/// other fields say.
pub fn scan_reading(city: &str, raw: &str) -> Result<WeatherReading> {
    if raw.trim().is_empty() {
        return Err(WeatherError::not_found(city));
    }

    let temp = extract_field(raw, "temp");
    if temp == NOT_AVAILABLE {
        return Err(WeatherError::not_found(city));
    }
    let kelvin = leading_number(temp).ok_or_else(|| WeatherError::not_found(city))?;

    Ok(WeatherReading {
        city: city.to_string(),
        temperature_c: kelvin_to_celsius(kelvin),
        description: extract_field(raw, "description").to_string(),
        humidity_pct: extract_field(raw, "humidity").trim().to_string(),
        pressure_hpa: extract_field(raw, "pressure").trim().to_string(),
        wind_speed_mps: extract_field(raw, "speed").trim().to_string(),
        observed_at: None,
    })
}

/// Parses the longest numeric prefix of `value`, ignoring leading whitespace.
///
/// A numeric field that closes its object reads as `300}}`; the prefix is
/// still the number.
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(value.len());

    (1..=end).rev().find_map(|len| value[..len].parse().ok())
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    dt: Option<i64>,
}

/// Builds a reading by deserializing the body.
///
/// Bodies without `main.temp` (such as OpenWeather's `"city not found"`
/// payload) are [`WeatherError::NotFound`]; bodies that are not JSON are
/// [`WeatherError::UnexpectedResponse`].
pub fn parse_reading(city: &str, raw: &str) -> Result<WeatherReading> {
    if raw.trim().is_empty() {
        return Err(WeatherError::not_found(city));
    }

    let parsed: OwCurrentResponse =
        serde_json::from_str(raw).map_err(|e| WeatherError::UnexpectedResponse {
            message: format!("Failed to parse OpenWeather current JSON: {e}"),
        })?;

    let main = parsed.main.ok_or_else(|| WeatherError::not_found(city))?;
    let kelvin = main.temp.ok_or_else(|| WeatherError::not_found(city))?;

    let description = parsed
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(WeatherReading {
        city: city.to_string(),
        temperature_c: kelvin_to_celsius(kelvin),
        description,
        humidity_pct: or_not_available(main.humidity),
        pressure_hpa: or_not_available(main.pressure),
        wind_speed_mps: or_not_available(parsed.wind.and_then(|w| w.speed)),
        observed_at: parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    })
}

fn or_not_available(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LONDON: &str = r#"{"coord":{"lon":-0.13,"lat":51.51},"weather":[{"id":300,"main":"Drizzle","description":"light intensity drizzle","icon":"09d"}],"base":"stations","main":{"temp":280.32,"pressure":1012,"humidity":81,"temp_min":279.15,"temp_max":281.15},"visibility":10000,"wind":{"speed":4.1,"deg":80},"clouds":{"all":90},"dt":1485789600,"id":2643743,"name":"London","cod":200}"#;

    const CITY_NOT_FOUND: &str = r#"{"cod":"404","message":"city not found"}"#;

    #[test]
    fn numeric_field_runs_to_next_comma() {
        assert_eq!(extract_field(r#"{"temp":293.15,"x":1}"#, "temp"), "293.15");
    }

    #[test]
    fn string_field_runs_to_next_quote() {
        let raw = r#"{"description":"clear sky","icon":"01d"}"#;
        assert_eq!(extract_field(raw, "description"), "clear sky");
    }

    #[test]
    fn missing_key_is_not_available() {
        assert_eq!(extract_field(r#"{"pressure":1012,"#, "temp"), "N/A");
        assert_eq!(extract_field("", "temp"), "N/A");
    }

    #[test]
    fn similar_keys_do_not_match() {
        assert_eq!(extract_field(r#"{"temp_min":279.15,"#, "temp"), "N/A");
    }

    #[test]
    fn missing_terminator_reads_to_end() {
        assert_eq!(extract_field(r#""temp":300"#, "temp"), "300");
        assert_eq!(extract_field(r#""description":"fog"#, "description"), "fog");
    }

    #[test]
    fn scan_reading_converts_kelvin() {
        let reading = scan_reading("London", LONDON).expect("reading");
        assert!((reading.temperature_c - 7.17).abs() < 1e-9);
        assert_eq!(reading.description, "light intensity drizzle");
        assert_eq!(reading.humidity_pct, "81");
        assert_eq!(reading.pressure_hpa, "1012");
        assert_eq!(reading.wind_speed_mps, "4.1");
        assert_eq!(reading.observed_at, None);
    }

    #[test]
    fn scan_reading_without_temp_is_not_found() {
        let err = scan_reading("Atlantis", CITY_NOT_FOUND).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Other fields present, temp still missing.
        let err = scan_reading("Atlantis", r#"{"humidity":50,"description":"x"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn scan_reading_reads_temp_that_closes_its_object() {
        let raw = r#"{"main":{"temp":300}}"#;
        assert_eq!(extract_field(raw, "temp"), "300}}");

        let scanned = scan_reading("X", raw).expect("scan");
        let parsed = parse_reading("X", raw).expect("json");
        assert!((scanned.temperature_c - 26.85).abs() < 1e-9);
        assert!((scanned.temperature_c - parsed.temperature_c).abs() < 1e-9);
    }

    #[test]
    fn leading_number_stops_at_first_non_numeric_char() {
        assert_eq!(leading_number(" 293.15"), Some(293.15));
        assert_eq!(leading_number("280.5e0}"), Some(280.5));
        assert_eq!(leading_number("-1.5-"), Some(-1.5));
        assert_eq!(leading_number("}"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn scan_reading_rejects_non_numeric_temp() {
        let err = scan_reading("X", r#"{"temp":"warm","#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn parse_reading_matches_scan_on_real_body() {
        let scanned = scan_reading("London", LONDON).expect("scan");
        let parsed = parse_reading("London", LONDON).expect("json");

        assert!((parsed.temperature_c - scanned.temperature_c).abs() < 1e-9);
        assert_eq!(parsed.description, scanned.description);
        assert_eq!(parsed.humidity_pct, scanned.humidity_pct);
        assert_eq!(parsed.pressure_hpa, scanned.pressure_hpa);
        assert_eq!(parsed.wind_speed_mps, scanned.wind_speed_mps);
        assert_eq!(parsed.observed_at, DateTime::from_timestamp(1_485_789_600, 0));
    }

    #[test]
    fn parse_reading_handles_not_found_payload() {
        let err = parse_reading("Atlantis", CITY_NOT_FOUND).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn parse_reading_rejects_non_json() {
        let err = parse_reading("London", "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn empty_body_is_not_found_for_both_parsers() {
        for parser in [ResponseParser::Json, ResponseParser::Scan] {
            let err = parser.parse("Nowhere", "  ").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{parser}");
        }
    }

    #[test]
    fn parser_names_roundtrip() {
        for parser in [ResponseParser::Json, ResponseParser::Scan] {
            assert_eq!(ResponseParser::try_from(parser.as_str()).unwrap(), parser);
        }
        assert_eq!("SCAN".parse::<ResponseParser>().unwrap(), ResponseParser::Scan);

        let err = ResponseParser::try_from("xml").unwrap_err();
        assert!(err.to_string().contains("Unknown parser"));
    }
}
