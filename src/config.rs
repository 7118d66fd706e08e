//! Provider endpoints, credentials and location.
//!
//! Stored as JSON on disk; every field is optional and falls back to the
//! defaults below:
//! ```json
//! {
//!   "weather": { "openweather_api_key": "...", "latitude": -15.7167 },
//!   "flights": { "airport_code": "mjn" },
//!   "catalog": { "supabase_url": "https://xyz.supabase.co", "supabase_anon_key": "..." },
//!   "utc_offset_hours": 3
//! }
//! ```

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

pub const MAJUNGA_LATITUDE: f64 = -15.7167;
pub const MAJUNGA_LONGITUDE: f64 = 46.3167;

/// Whole-hour offsets in use around the world, UTC-12 to UTC+14.
pub const UTC_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -12..=14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub openweather_url: String,
    pub openweather_api_key: Option<String>,
    pub open_meteo_url: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            openweather_url: "https://api.openweathermap.org".to_string(),
            openweather_api_key: None,
            open_meteo_url: "https://api.open-meteo.com".to_string(),
            latitude: MAJUNGA_LATITUDE,
            longitude: MAJUNGA_LONGITUDE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub skyscanner_url: String,
    pub airport_code: String,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            skyscanner_url: "https://www.skyscanner.net".to_string(),
            airport_code: "mjn".to_string(),
        }
    }
}

/// Hosted table store for tours and shuttles. Both fields are needed for
/// the live source to be used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl CatalogConfig {
    /// URL and key, when both are set and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = non_blank(self.supabase_url.as_deref())?;
        let key = non_blank(self.supabase_anon_key.as_deref())?;
        Some((url, key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub weather: WeatherConfig,
    pub flights: FlightConfig,
    pub catalog: CatalogConfig,
    pub utc_offset_hours: i32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            flights: FlightConfig::default(),
            catalog: CatalogConfig::default(),
            utc_offset_hours: 3,
        }
    }
}

impl FeedConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config '{path}'"))?;
        Ok(config)
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `OPENWEATHER_API_KEY`-style overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("OPENWEATHER_API_KEY") {
            self.weather.openweather_api_key = Some(v);
        }
        if let Some(v) = var("OPENWEATHER_URL") {
            self.weather.openweather_url = v;
        }
        if let Some(v) = var("OPEN_METEO_URL") {
            self.weather.open_meteo_url = v;
        }
        if let Some(v) = var("MAJUNGA_LAT") {
            self.weather.latitude = parse_var("MAJUNGA_LAT", &v)?;
        }
        if let Some(v) = var("MAJUNGA_LON") {
            self.weather.longitude = parse_var("MAJUNGA_LON", &v)?;
        }
        if let Some(v) = var("SKYSCANNER_URL") {
            self.flights.skyscanner_url = v;
        }
        if let Some(v) = var("AIRPORT_CODE") {
            self.flights.airport_code = v;
        }
        if let Some(v) = var("SUPABASE_URL") {
            self.catalog.supabase_url = Some(v);
        }
        if let Some(v) = var("SUPABASE_ANON_KEY") {
            self.catalog.supabase_anon_key = Some(v);
        }
        if let Some(v) = var("UTC_OFFSET_HOURS") {
            self.utc_offset_hours = parse_var("UTC_OFFSET_HOURS", &v)?;
        }
        Ok(())
    }

    pub fn openweather_key(&self) -> Option<&str> {
        non_blank(self.weather.openweather_api_key.as_deref())
    }

    /// Destination offset from UTC. Only real-world offsets are accepted.
    pub fn offset(&self) -> Result<FixedOffset> {
        let hours = self.utc_offset_hours;
        if !UTC_OFFSET_RANGE.contains(&hours) {
            return Err(anyhow!("utc_offset_hours {hours} is out of range"));
        }
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("utc_offset_hours {hours} is out of range"))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{name}='{value}' is not valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.weather.latitude, -15.7167);
        assert_eq!(config.flights.airport_code, "mjn");
        assert_eq!(config.offset().unwrap().local_minus_utc(), 3 * 3600);
        assert!(config.openweather_key().is_none());
        assert!(config.catalog.credentials().is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: FeedConfig = serde_json::from_str(
            r#"{ "weather": { "openweather_api_key": "k" }, "utc_offset_hours": 2 }"#,
        )
        .unwrap();

        assert_eq!(config.openweather_key(), Some("k"));
        assert_eq!(config.weather.longitude, 46.3167);
        assert_eq!(config.flights.skyscanner_url, "https://www.skyscanner.net");
        assert_eq!(config.utc_offset_hours, 2);
    }

    #[test]
    fn test_load_from_file() {
        let path = format!("{}/majunga_feeds_config_test.json", std::env::temp_dir().display());
        std::fs::write(&path, r#"{ "flights": { "airport_code": "tnr" } }"#).unwrap();

        let config = FeedConfig::load(&path).unwrap();
        assert_eq!(config.flights.airport_code, "tnr");

        std::fs::remove_file(&path).unwrap();
        assert!(FeedConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENWEATHER_API_KEY", "abc"),
            ("MAJUNGA_LAT", "-16.0"),
            ("SUPABASE_URL", "https://xyz.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("AIRPORT_CODE", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = FeedConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.openweather_key(), Some("abc"));
        assert_eq!(config.weather.latitude, -16.0);
        assert_eq!(config.flights.airport_code, "mjn");
        assert_eq!(
            config.catalog.credentials(),
            Some(("https://xyz.supabase.co", "anon"))
        );
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let mut config = FeedConfig::default();
        let err = config
            .apply_overrides(|name| (name == "UTC_OFFSET_HOURS").then(|| "three".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("UTC_OFFSET_HOURS"));
    }

    #[test]
    fn test_offset_out_of_range() {
        for hours in [30, -20, 15, -13] {
            let config = FeedConfig {
                utc_offset_hours: hours,
                ..FeedConfig::default()
            };
            assert!(config.offset().is_err(), "{hours} accepted");
        }
    }

    #[test]
    fn test_offset_range_edges() {
        for (hours, seconds) in [(-12, -43200), (0, 0), (14, 50400)] {
            let config = FeedConfig {
                utc_offset_hours: hours,
                ..FeedConfig::default()
            };
            assert_eq!(config.offset().unwrap().local_minus_utc(), seconds);
        }
    }

    #[test]
    fn test_huge_env_offset_is_an_error() {
        let mut config = FeedConfig::default();
        config
            .apply_overrides(|name| (name == "UTC_OFFSET_HOURS").then(|| "600000".to_string()))
            .unwrap();

        let err = config.offset().unwrap_err();
        assert!(err.to_string().contains("600000"));
    }
}
