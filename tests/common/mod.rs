use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use majunga_feeds::fetch::HttpClient;
use majunga_feeds::i18n::Locale;
use majunga_feeds::model::FetchContext;
use reqwest::header::HeaderMap;
use reqwest::{Request, Response, Url};

pub const OWM_CURRENT: &str = "/data/2.5/weather";
pub const OWM_FORECAST: &str = "/data/2.5/forecast";
pub const OPEN_METEO: &str = "/v1/forecast";
pub const DEPARTURES: &str = "/g/arrival-departure-svc/api/airports/mjn/departures";
pub const ARRIVALS: &str = "/g/arrival-departure-svc/api/airports/mjn/arrivals";
pub const TOURS: &str = "/rest/v1/tours";
pub const SHUTTLES: &str = "/rest/v1/shuttle_schedules";

/// Answers by URL path from a fixed script. Unscripted paths get a 503.
#[derive(Default)]
pub struct ScriptedClient {
    routes: Mutex<HashMap<String, (u16, String)>>,
    calls: Mutex<Vec<(Url, HeaderMap)>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn calls_to(&self, path: &str) -> Vec<(Url, HeaderMap)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.path() == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.calls_to(path).len()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        let url = req.url().clone();
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), req.headers().clone()));

        let (status, body) = self
            .routes
            .lock()
            .unwrap()
            .get(url.path())
            .cloned()
            .unwrap_or((503, String::new()));

        let resp = http::Response::builder()
            .status(status)
            .body(body)
            .unwrap();
        Ok(Response::from(resp))
    }
}

pub fn ctx(locale: Locale) -> FetchContext {
    FetchContext::new(
        locale,
        NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
        FixedOffset::east_opt(3 * 3600).unwrap(),
    )
}

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {path}: {e}"))
}
