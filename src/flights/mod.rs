//! Airport flight board: arrivals and departures at one airport.

mod fallback;
mod skyscanner;

pub use fallback::fallback;
pub use skyscanner::Skyscanner;

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::model::{NormalizedSeries, serialize_clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightKind {
    Departure,
    Arrival,
}

/// Canonical flight status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Scheduled,
    Delayed,
    Cancelled,
    Boarding,
    Departed,
    Arrived,
}

impl FlightStatus {
    /// Maps a provider status string. Unknown or missing statuses are
    /// treated as [`FlightStatus::Scheduled`].
    pub fn from_provider(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("landed" | "arrived") => FlightStatus::Arrived,
            Some("cancelled") => FlightStatus::Cancelled,
            Some("delayed" | "incident") => FlightStatus::Delayed,
            Some("boarding") => FlightStatus::Boarding,
            Some("departed") => FlightStatus::Departed,
            _ => FlightStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub id: String,
    pub kind: FlightKind,
    pub airline: String,
    pub flight_number: String,
    /// The other airport, as `"Name (CODE)"`.
    pub route: String,
    #[serde(serialize_with = "serialize_clock")]
    pub departure_time: Option<NaiveTime>,
    #[serde(serialize_with = "serialize_clock")]
    pub arrival_time: Option<NaiveTime>,
    pub status: FlightStatus,
    pub status_label: String,
    pub gate: String,
    pub terminal: String,
    pub aircraft: String,
    #[serde(serialize_with = "serialize_clock")]
    pub estimated_departure: Option<NaiveTime>,
    #[serde(serialize_with = "serialize_clock")]
    pub estimated_arrival: Option<NaiveTime>,
}

impl Flight {
    /// Departure time for departures, arrival time for arrivals.
    pub fn board_time(&self) -> Option<NaiveTime> {
        match self.kind {
            FlightKind::Departure => self.departure_time,
            FlightKind::Arrival => self.arrival_time,
        }
    }
}

/// Ascending by [`Flight::board_time`]; flights without a time go last.
/// Stable, so equal times keep their delivery order.
pub fn sort_by_board_time(flights: &mut [Flight]) {
    flights.sort_by(|a, b| match (a.board_time(), b.board_time()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Which half of the board to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardView {
    #[default]
    All,
    Departures,
    Arrivals,
}

impl BoardView {
    pub fn includes(&self, kind: FlightKind) -> bool {
        match self {
            BoardView::All => true,
            BoardView::Departures => kind == FlightKind::Departure,
            BoardView::Arrivals => kind == FlightKind::Arrival,
        }
    }

    pub fn filter<'a>(&self, board: &'a NormalizedSeries<Flight>) -> Vec<&'a Flight> {
        board.iter().filter(|f| self.includes(f.kind)).collect()
    }
}

impl FromStr for BoardView {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(BoardView::All),
            "departures" => Ok(BoardView::Departures),
            "arrivals" => Ok(BoardView::Arrivals),
            other => Err(anyhow::anyhow!("unknown board view '{other}'")),
        }
    }
}
