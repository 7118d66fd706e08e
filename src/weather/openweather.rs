use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Timelike};
use serde::Deserialize;
use tracing::debug;

use super::{
    WeatherObservation, WeatherReport, day_label, forecast_dates, ms_to_kmh, round_celsius,
    select_representative,
};
use crate::error::SourceError;
use crate::fallback::Source;
use crate::fetch::{HttpClient, build_url, fetch_json};
use crate::model::{FetchContext, NormalizedSeries};

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    #[serde(default)]
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Sky {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Current {
    main: Main,
    weather: Vec<Sky>,
    wind: Wind,
    /// Metres.
    #[serde(default)]
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: Main,
    weather: Vec<Sky>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    list: Vec<ForecastItem>,
}

/// OpenWeatherMap current-conditions and 5-day/3-hour forecast endpoints.
///
/// The `appid` key is expected to be injected by the client (see
/// [`crate::fetch::auth::UrlParam`]).
pub struct OpenWeatherMap {
    client: Arc<dyn HttpClient>,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl OpenWeatherMap {
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

    fn query(&self, ctx: &FetchContext) -> Vec<(&'static str, String)> {
        vec![
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("units", "metric".to_string()),
            ("lang", ctx.locale.code().to_string()),
        ]
    }
}

#[async_trait]
impl Source<WeatherReport> for OpenWeatherMap {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<WeatherReport, SourceError> {
        let query = self.query(ctx);
        let current_url = build_url(&self.base_url, "/data/2.5/weather", &query)?;
        let forecast_url = build_url(&self.base_url, "/data/2.5/forecast", &query)?;

        // Both halves must succeed for this source to count.
        let (current, forecast) = tokio::try_join!(
            fetch_json::<Current>(self.client.as_ref(), current_url),
            fetch_json::<Forecast>(self.client.as_ref(), forecast_url),
        )?;

        Ok(WeatherReport {
            current: normalize_current(&current)?,
            forecast: normalize_forecast(&forecast, ctx)?,
        })
    }
}

fn first_sky<'a>(weather: &'a [Sky], what: &str) -> Result<&'a Sky, SourceError> {
    weather
        .first()
        .ok_or_else(|| SourceError::Shape(format!("{what}.weather[0]")))
}

fn normalize_current(raw: &Current) -> Result<WeatherObservation, SourceError> {
    let sky = first_sky(&raw.weather, "current")?;
    Ok(WeatherObservation {
        temperature: round_celsius(raw.main.temp),
        description: sky.description.clone(),
        icon: sky.icon.clone(),
        humidity: raw.main.humidity.round() as i32,
        wind_speed: ms_to_kmh(raw.wind.speed),
        feels_like: round_celsius(raw.main.feels_like),
        pressure: raw.main.pressure.map(|p| p.round() as i32),
        visibility: raw.visibility.map(|m| (m / 1000.0).round() as i32),
        date: None,
        day_name: None,
    })
}

fn normalize_forecast(
    raw: &Forecast,
    ctx: &FetchContext,
) -> Result<NormalizedSeries<WeatherObservation>, SourceError> {
    // Bucket every item by its local date and hour at the destination.
    let local: Vec<_> = raw
        .list
        .iter()
        .filter_map(|item| {
            let at = DateTime::from_timestamp(item.dt, 0)?.with_timezone(&ctx.offset);
            Some((at, item))
        })
        .collect();

    let mut days = Vec::new();
    for date in forecast_dates(ctx) {
        let subset: Vec<_> = local.iter().filter(|(at, _)| at.date_naive() == date).collect();
        let Some((at, item)) = select_representative(&subset, |(at, _)| at.hour()).copied() else {
            debug!(%date, "No forecast records for day, skipping");
            continue;
        };

        let Some(sky) = item.weather.first() else {
            debug!(%date, "Forecast record has no sky data, skipping");
            continue;
        };
        let (label, day_name) = day_label(ctx, at.date_naive());
        days.push(WeatherObservation {
            temperature: round_celsius(item.main.temp),
            description: sky.description.clone(),
            icon: sky.icon.clone(),
            humidity: item.main.humidity.round() as i32,
            wind_speed: ms_to_kmh(item.wind.speed),
            feels_like: round_celsius(item.main.feels_like),
            pressure: item.main.pressure.map(|p| p.round() as i32),
            visibility: None,
            date: Some(label),
            day_name: Some(day_name),
        });
    }

    NormalizedSeries::new(days).ok_or(SourceError::Empty("forecast days"))
}
