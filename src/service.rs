//! Wires configured sources into one fetcher per domain.

use std::sync::Arc;

use anyhow::Result;
use chrono::FixedOffset;
use tracing::info;

use crate::catalog::{self, ShuttleSchedule, ShuttleTable, TableStore, Tour, TourTable};
use crate::config::FeedConfig;
use crate::fallback::ResilientFetcher;
use crate::fetch::auth::{ApiKey, UrlParam};
use crate::fetch::{BasicClient, HttpClient};
use crate::flights::{self, Flight, Skyscanner};
use crate::model::NormalizedSeries;
use crate::weather::{self, OpenMeteo, OpenWeatherMap, WeatherReport};

pub struct MajungaFeeds {
    pub weather: Arc<ResilientFetcher<WeatherReport>>,
    pub flights: Arc<ResilientFetcher<NormalizedSeries<Flight>>>,
    pub tours: Arc<ResilientFetcher<NormalizedSeries<Tour>>>,
    pub shuttles: Arc<ResilientFetcher<NormalizedSeries<ShuttleSchedule>>>,
    pub offset: FixedOffset,
}

impl MajungaFeeds {
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(BasicClient::new()))
    }

    /// Builds every fetcher on top of `transport`. Credentials are layered
    /// on per provider.
    pub fn with_transport(config: &FeedConfig, transport: Arc<dyn HttpClient>) -> Result<Self> {
        let offset = config.offset()?;
        let w = &config.weather;

        let mut weather = ResilientFetcher::new("weather", weather::fallback);
        match config.openweather_key() {
            Some(key) => {
                let client = Arc::new(UrlParam::new(transport.clone(), "appid", key));
                weather = weather.with_source(Arc::new(OpenWeatherMap::new(
                    client,
                    &w.openweather_url,
                    w.latitude,
                    w.longitude,
                )));
            }
            None => info!("No OpenWeatherMap key configured, skipping primary weather source"),
        }
        let weather = weather.with_source(Arc::new(OpenMeteo::new(
            transport.clone(),
            &w.open_meteo_url,
            w.latitude,
            w.longitude,
        )));

        let flights = ResilientFetcher::new("flights", flights::fallback).with_source(Arc::new(
            Skyscanner::new(
                transport.clone(),
                &config.flights.skyscanner_url,
                &config.flights.airport_code,
            ),
        ));

        let mut tours = ResilientFetcher::new("tours", catalog::tour_fallback);
        let mut shuttles = ResilientFetcher::new("shuttles", catalog::shuttle_fallback);
        match config.catalog.credentials() {
            Some((url, key)) => {
                let client = ApiKey::new(ApiKey::bearer(transport, key)?, "apikey", key)?;
                let store = Arc::new(TableStore::new(Arc::new(client), url));
                tours = tours.with_source(Arc::new(TourTable(store.clone())));
                shuttles = shuttles.with_source(Arc::new(ShuttleTable(store)));
            }
            None => info!("No table store configured, tours and shuttles use built-in data"),
        }

        Ok(Self {
            weather: Arc::new(weather),
            flights: Arc::new(flights),
            tours: Arc::new(tours),
            shuttles: Arc::new(shuttles),
            offset,
        })
    }
}
