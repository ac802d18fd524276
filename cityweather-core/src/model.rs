use std::fmt;

use chrono::{DateTime, Utc};

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Value used when a field is absent from the API response.
pub const NOT_AVAILABLE: &str = "N/A";

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Current conditions for one city, built per query and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: String,
    pub pressure_hpa: String,
    pub wind_speed_mps: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl fmt::Display for WeatherReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Temp: {:.2}°C", self.temperature_c)?;
        writeln!(f, "Condition: {}", self.description)?;
        writeln!(f, "Humidity: {}%", self.humidity_pct)?;
        writeln!(f, "Pressure: {} hPa", self.pressure_hpa)?;
        write!(f, "Wind Speed: {} m/s", self.wind_speed_mps)?;
        if let Some(at) = self.observed_at {
            write!(f, "\nObserved: {}", at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(kelvin: f64) -> WeatherReading {
        WeatherReading {
            city: "Oslo".into(),
            temperature_c: kelvin_to_celsius(kelvin),
            description: "light snow".into(),
            humidity_pct: "87".into(),
            pressure_hpa: "1002".into(),
            wind_speed_mps: NOT_AVAILABLE.into(),
            observed_at: None,
        }
    }

    #[test]
    fn freezing_point_displays_as_zero() {
        let text = reading(273.15).to_string();
        assert!(text.contains("Temp: 0.00°C"), "{text}");
    }

    #[test]
    fn display_lists_every_field() {
        let text = reading(293.15).to_string();
        assert_eq!(
            text,
            "City: Oslo\nTemp: 20.00°C\nCondition: light snow\nHumidity: 87%\n\
             Pressure: 1002 hPa\nWind Speed: N/A m/s"
        );
    }

    #[test]
    fn observation_time_is_appended_when_known() {
        let mut r = reading(280.0);
        r.observed_at = DateTime::from_timestamp(1_700_000_000, 0);
        assert!(r.to_string().ends_with("Observed: 2023-11-14 22:13 UTC"));
    }
}
