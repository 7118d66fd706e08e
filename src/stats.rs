use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::flights::{Flight, FlightKind, FlightStatus};
use crate::model::{Fetched, NOT_APPLICABLE, NormalizedSeries};

/// Field coverage of one flight board, for logs and CSV history.
#[derive(Debug, Default, Serialize)]
pub struct BoardStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub provenance: Option<String>,
    /// False when the board is the built-in schedule.
    pub live: bool,
    pub total_flights: usize,

    // directions
    pub departures: usize,
    pub arrivals: usize,

    // status
    pub delayed: usize,
    pub cancelled: usize,

    // field coverage
    pub with_board_time: usize,
    pub with_gate: usize,
    pub with_terminal: usize,
    pub with_aircraft: usize,
    pub with_estimate: usize,
}

impl BoardStats {
    pub fn from_board(board: &NormalizedSeries<Flight>) -> Self {
        let mut s = BoardStats {
            timestamp: Utc::now(),
            total_flights: board.len(),
            ..Default::default()
        };

        for f in board {
            match f.kind {
                FlightKind::Departure => s.departures += 1,
                FlightKind::Arrival => s.arrivals += 1,
            }

            match f.status {
                FlightStatus::Delayed => s.delayed += 1,
                FlightStatus::Cancelled => s.cancelled += 1,
                _ => {}
            }

            if f.board_time().is_some() {
                s.with_board_time += 1;
            }

            if f.gate != NOT_APPLICABLE {
                s.with_gate += 1;
            }

            if f.terminal != NOT_APPLICABLE {
                s.with_terminal += 1;
            }

            if f.aircraft != NOT_APPLICABLE {
                s.with_aircraft += 1;
            }

            if f.estimated_departure.is_some() || f.estimated_arrival.is_some() {
                s.with_estimate += 1;
            }
        }

        s
    }

    /// Stats tagged with the source that produced the board.
    pub fn from_fetched(fetched: &Fetched<NormalizedSeries<Flight>>) -> Self {
        Self {
            source: Some(fetched.source.clone()),
            provenance: Some(fetched.provenance.to_string()),
            live: fetched.provenance.is_live(),
            ..Self::from_board(&fetched.value)
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn board_time_pct(&self) -> f64 {
        Self::pct(self.with_board_time, self.total_flights)
    }

    pub fn gate_pct(&self) -> f64 {
        Self::pct(self.with_gate, self.total_flights)
    }
}
