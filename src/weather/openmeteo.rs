use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{
    Condition, FORECAST_DAYS, REPRESENTATIVE_HOUR, WeatherObservation, WeatherReport, day_label,
    forecast_dates, ms_to_kmh, round_celsius,
};
use crate::error::SourceError;
use crate::fallback::Source;
use crate::fetch::{HttpClient, build_url, fetch_json};
use crate::i18n::strings;
use crate::model::{FetchContext, NormalizedSeries};

const VARIABLES: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i64,
    wind_speed_10m: f64,
}

/// Column-oriented hourly arrays, all indexed like `time`.
#[derive(Debug, Deserialize)]
struct Hourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    apparent_temperature: Vec<Option<f64>>,
    weather_code: Vec<Option<i64>>,
    wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Response {
    current: Current,
    hourly: Hourly,
}

/// Open-Meteo forecast endpoint. Keyless, used when the primary fails.
///
/// Open-Meteo has no localization, so descriptions come from the locale
/// tables. Wind is requested in m/s so the shared conversion applies.
pub struct OpenMeteo {
    client: Arc<dyn HttpClient>,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl OpenMeteo {
    pub fn new(
        client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            latitude,
            longitude,
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("current", VARIABLES.to_string()),
            ("hourly", VARIABLES.to_string()),
            ("wind_speed_unit", "ms".to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ]
    }
}

#[async_trait]
impl Source<WeatherReport> for OpenMeteo {
    fn name(&self) -> &str {
        "open-meteo"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<WeatherReport, SourceError> {
        let url = build_url(&self.base_url, "/v1/forecast", &self.query())?;
        let raw: Response = fetch_json(self.client.as_ref(), url).await?;
        normalize(&raw, ctx)
    }
}

fn cell<T: Copy>(column: &[Option<T>], idx: usize) -> Option<T> {
    column.get(idx).copied().flatten()
}

fn normalize(raw: &Response, ctx: &FetchContext) -> Result<WeatherReport, SourceError> {
    let condition = Condition::from_wmo(raw.current.weather_code);
    let current = WeatherObservation {
        temperature: round_celsius(raw.current.temperature_2m),
        description: strings::condition(ctx.locale, condition).to_string(),
        icon: condition.icon().to_string(),
        humidity: raw.current.relative_humidity_2m.round() as i32,
        wind_speed: ms_to_kmh(raw.current.wind_speed_10m),
        feels_like: round_celsius(raw.current.apparent_temperature),
        pressure: None,
        visibility: None,
        date: None,
        day_name: None,
    };

    let hourly = &raw.hourly;
    let mut days = Vec::new();
    for date in forecast_dates(ctx) {
        let stamp = format!("{}T{REPRESENTATIVE_HOUR:02}:00", date.format("%Y-%m-%d"));
        let Some(idx) = hourly.time.iter().position(|t| *t == stamp) else {
            debug!(%stamp, "No hourly record at representative hour, skipping");
            continue;
        };

        let (Some(temp), Some(humidity), Some(feels), Some(wind), Some(code)) = (
            cell(&hourly.temperature_2m, idx),
            cell(&hourly.relative_humidity_2m, idx),
            cell(&hourly.apparent_temperature, idx),
            cell(&hourly.wind_speed_10m, idx),
            cell(&hourly.weather_code, idx),
        ) else {
            debug!(%stamp, "Hourly record incomplete, skipping");
            continue;
        };

        let condition = Condition::from_wmo(code);
        let (label, day_name) = day_label(ctx, date);
        days.push(WeatherObservation {
            temperature: round_celsius(temp),
            description: strings::condition(ctx.locale, condition).to_string(),
            icon: condition.icon().to_string(),
            humidity: humidity.round() as i32,
            wind_speed: ms_to_kmh(wind),
            feels_like: round_celsius(feels),
            pressure: None,
            visibility: None,
            date: Some(label),
            day_name: Some(day_name),
        });
    }

    let forecast = NormalizedSeries::new(days).ok_or(SourceError::Empty("hourly forecast"))?;
    Ok(WeatherReport { current, forecast })
}
