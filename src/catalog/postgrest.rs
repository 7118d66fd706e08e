use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{DEFAULT_CURRENCY, ShuttleSchedule, Tour, summarize};
use crate::error::SourceError;
use crate::fallback::Source;
use crate::fetch::{HttpClient, build_url, fetch_json};
use crate::model::{FetchContext, NormalizedSeries};

const SHORT_DESCRIPTION_CHARS: usize = 150;
const DEFAULT_SEATS: u32 = 20;
const DEFAULT_FROM: &str = "Majunga";
const DEFAULT_TO: &str = "Antananarivo";

/// Read access to the hosted PostgREST table API.
///
/// Credentials (`apikey` and bearer `Authorization`) are expected on the
/// client, see [`crate::fetch::auth::ApiKey`].
pub struct TableStore {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl TableStore {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Active rows of `table` in the given `order`, decoded one by one.
    /// Rows that do not decode are skipped.
    async fn active_rows<R: DeserializeOwned>(
        &self,
        table: &str,
        order: &str,
    ) -> Result<Vec<R>, SourceError> {
        let url = build_url(
            &self.base_url,
            &format!("/rest/v1/{table}"),
            &[
                ("select", "*".to_string()),
                ("is_active", "eq.true".to_string()),
                ("order", order.to_string()),
            ],
        )?;

        let rows: Vec<Value> = fetch_json(self.client.as_ref(), url).await?;
        let total = rows.len();
        let decoded: Vec<R> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(table, error = %e, "Skipping malformed row");
                    None
                }
            })
            .collect();

        debug!(table, total, decoded = decoded.len(), "Rows fetched");
        Ok(decoded)
    }
}

#[derive(Debug, Deserialize)]
struct TourRow {
    title: String,
    description: String,
    price: f64,
    duration: String,
    #[serde(default)]
    highlights: Vec<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShuttleRow {
    departure_time: String,
    arrival_time: String,
    route: String,
    price: f64,
}

/// The `tours` table, newest first.
pub struct TourTable(pub Arc<TableStore>);

#[async_trait]
impl Source<NormalizedSeries<Tour>> for TourTable {
    fn name(&self) -> &str {
        "postgrest:tours"
    }

    async fn fetch(&self, _ctx: &FetchContext) -> Result<NormalizedSeries<Tour>, SourceError> {
        let rows: Vec<TourRow> = self.0.active_rows("tours", "created_at.desc").await?;
        let tours = rows.into_iter().enumerate().map(|(i, row)| tour_from_row(i, row)).collect();
        NormalizedSeries::new(tours).ok_or(SourceError::Empty("tours"))
    }
}

/// The `shuttle_schedules` table, by departure time.
pub struct ShuttleTable(pub Arc<TableStore>);

#[async_trait]
impl Source<NormalizedSeries<ShuttleSchedule>> for ShuttleTable {
    fn name(&self) -> &str {
        "postgrest:shuttle_schedules"
    }

    async fn fetch(
        &self,
        _ctx: &FetchContext,
    ) -> Result<NormalizedSeries<ShuttleSchedule>, SourceError> {
        let rows: Vec<ShuttleRow> = self
            .0
            .active_rows("shuttle_schedules", "departure_time.asc")
            .await?;
        let schedules = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| shuttle_from_row(i, row))
            .collect();
        NormalizedSeries::new(schedules).ok_or(SourceError::Empty("shuttle schedules"))
    }
}

fn tour_from_row(index: usize, row: TourRow) -> Tour {
    Tour {
        id: index as u32 + 1,
        title: row.title,
        short_description: summarize(&row.description, SHORT_DESCRIPTION_CHARS),
        full_description: row.description,
        duration: row.duration,
        price: row.price,
        currency: DEFAULT_CURRENCY.to_string(),
        images: row.image_url.into_iter().filter(|u| !u.is_empty()).collect(),
        highlights: row.highlights,
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw.trim(), fmt).ok())
}

fn shuttle_from_row(index: usize, row: ShuttleRow) -> ShuttleSchedule {
    let mut parts = row.route.split(" - ").map(str::trim).filter(|p| !p.is_empty());
    let from = parts.next().unwrap_or(DEFAULT_FROM).to_string();
    let to = parts.next().unwrap_or(DEFAULT_TO).to_string();

    ShuttleSchedule {
        id: index as u32 + 1,
        departure_time: parse_time(&row.departure_time),
        arrival_time: parse_time(&row.arrival_time),
        from,
        to,
        price: row.price,
        currency: DEFAULT_CURRENCY.to_string(),
        available_seats: DEFAULT_SEATS,
    }
}
