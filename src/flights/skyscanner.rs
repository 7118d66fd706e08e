use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Flight, FlightKind, FlightStatus, sort_by_board_time};
use crate::error::SourceError;
use crate::fallback::Source;
use crate::fetch::{HttpClient, build_url, fetch_json};
use crate::i18n::strings;
use crate::model::{FetchContext, NOT_APPLICABLE, NOT_AVAILABLE, NormalizedSeries};

/// Skyscanner's public arrival/departure board for one airport.
///
/// Departures and arrivals are fetched concurrently. Unlike the weather
/// sources, a failed direction only empties its half of the board; the
/// source fails when neither direction yields a flight.
pub struct Skyscanner {
    client: Arc<dyn HttpClient>,
    base_url: String,
    airport: String,
}

impl Skyscanner {
    pub fn new(
        client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        airport: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            airport: airport.into().to_ascii_lowercase(),
        }
    }

    async fn direction(
        &self,
        kind: FlightKind,
        ctx: &FetchContext,
    ) -> Result<Vec<Flight>, SourceError> {
        let key = match kind {
            FlightKind::Departure => "departures",
            FlightKind::Arrival => "arrivals",
        };
        let path = format!(
            "/g/arrival-departure-svc/api/airports/{}/{key}",
            self.airport
        );
        let url = build_url(
            &self.base_url,
            &path,
            &[("locale", ctx.locale.bcp47().to_string())],
        )?;

        let payload: Value = fetch_json(self.client.as_ref(), url).await?;
        if !payload.is_object() {
            return Err(SourceError::Shape(format!("{key} payload is not an object")));
        }

        let records = payload[key].as_array().map(Vec::as_slice).unwrap_or_default();
        let flights: Vec<Flight> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let flight = normalize_record(record, index, kind, ctx);
                if flight.is_none() {
                    debug!(index, direction = key, "Skipping non-object flight record");
                }
                flight
            })
            .collect();

        debug!(direction = key, count = flights.len(), "Flights normalized");
        Ok(flights)
    }
}

#[async_trait]
impl Source<NormalizedSeries<Flight>> for Skyscanner {
    fn name(&self) -> &str {
        "skyscanner"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<NormalizedSeries<Flight>, SourceError> {
        let (departures, arrivals) = tokio::join!(
            self.direction(FlightKind::Departure, ctx),
            self.direction(FlightKind::Arrival, ctx),
        );

        let mut flights = match (departures, arrivals) {
            (Err(dep), Err(arr)) => {
                warn!(error = %arr, "Arrivals fetch failed");
                return Err(dep);
            }
            (Ok(dep), Err(e)) => {
                warn!(error = %e, kind = e.kind(), "Arrivals fetch failed, keeping departures");
                dep
            }
            (Err(e), Ok(arr)) => {
                warn!(error = %e, kind = e.kind(), "Departures fetch failed, keeping arrivals");
                arr
            }
            (Ok(mut dep), Ok(arr)) => {
                dep.extend(arr);
                dep
            }
        };

        sort_by_board_time(&mut flights);
        NormalizedSeries::new(flights).ok_or(SourceError::Empty("flights"))
    }
}

/// Reads a field as display text. Numbers are stringified, blanks and any
/// other JSON type count as missing.
fn text(record: &Value, field: &str) -> Option<String> {
    match &record[field] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses a provider timestamp such as `2025-08-19T11:15` into a clock time.
fn clock(record: &Value, field: &str) -> Option<NaiveTime> {
    let raw = text(record, field)?;
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|dt| dt.time())
}

fn airport(record: &Value, name_field: &str, code_field: &str) -> String {
    match (text(record, name_field), text(record, code_field)) {
        (Some(name), Some(code)) => format!("{name} ({code})"),
        (Some(name), None) => name,
        (None, Some(code)) => code,
        (None, None) => NOT_AVAILABLE.to_string(),
    }
}

fn normalize_record(
    record: &Value,
    index: usize,
    kind: FlightKind,
    ctx: &FetchContext,
) -> Option<Flight> {
    if !record.is_object() {
        return None;
    }

    let flight_number = text(record, "flightNumber");
    let (prefix, route, gate, terminal) = match kind {
        FlightKind::Departure => (
            "dep",
            airport(record, "arrivalAirportName", "arrivalAirportCode"),
            text(record, "boardingGate"),
            text(record, "departureTerminalLocalised"),
        ),
        FlightKind::Arrival => (
            "arr",
            airport(record, "departureAirportName", "departureAirportCode"),
            text(record, "arrivalGate"),
            text(record, "arrivalTerminalLocalised"),
        ),
    };
    let status = FlightStatus::from_provider(text(record, "status").as_deref());

    Some(Flight {
        id: format!(
            "{prefix}-{}",
            flight_number.clone().unwrap_or_else(|| index.to_string())
        ),
        kind,
        airline: text(record, "airlineName")
            .unwrap_or_else(|| strings::unknown_airline(ctx.locale).to_string()),
        flight_number: flight_number.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        route,
        departure_time: clock(record, "localisedScheduledDepartureTime"),
        arrival_time: clock(record, "localisedScheduledArrivalTime"),
        status,
        status_label: strings::flight_status(ctx.locale, status).to_string(),
        gate: gate.unwrap_or_else(|| NOT_APPLICABLE.to_string()),
        terminal: terminal.unwrap_or_else(|| NOT_APPLICABLE.to_string()),
        aircraft: NOT_APPLICABLE.to_string(),
        estimated_departure: clock(record, "localisedEstimatedDepartureTime"),
        estimated_arrival: clock(record, "localisedEstimatedArrivalTime"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use chrono::{FixedOffset, NaiveDate};
    use serde_json::json;

    fn ctx(locale: Locale) -> FetchContext {
        FetchContext::new(
            locale,
            NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
            FixedOffset::east_opt(3 * 3600).unwrap(),
        )
    }

    #[test]
    fn test_full_departure_record() {
        let record = json!({
            "flightNumber": "MD 701",
            "airlineName": "Air Madagascar",
            "arrivalAirportName": "Antananarivo",
            "arrivalAirportCode": "TNR",
            "localisedScheduledDepartureTime": "2025-08-19T08:30",
            "localisedScheduledArrivalTime": "2025-08-19T09:45:00",
            "localisedEstimatedDepartureTime": "2025-08-19T08:50",
            "status": "Delayed",
            "boardingGate": "A1",
            "departureTerminalLocalised": "1"
        });

        let f = normalize_record(&record, 0, FlightKind::Departure, &ctx(Locale::En)).unwrap();
        assert_eq!(f.id, "dep-MD 701");
        assert_eq!(f.route, "Antananarivo (TNR)");
        assert_eq!(f.departure_time, NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(f.arrival_time, NaiveTime::from_hms_opt(9, 45, 0));
        assert_eq!(f.estimated_departure, NaiveTime::from_hms_opt(8, 50, 0));
        assert_eq!(f.estimated_arrival, None);
        assert_eq!(f.status, FlightStatus::Delayed);
        assert_eq!(f.status_label, "Delayed");
        assert_eq!(f.gate, "A1");
        assert_eq!(f.aircraft, "-");
    }

    #[test]
    fn test_missing_and_malformed_fields_degrade() {
        let record = json!({
            "flightNumber": "",
            "airlineName": null,
            "departureAirportCode": "NOS",
            "localisedScheduledArrivalTime": "tomorrow-ish",
            "status": 7,
            "arrivalGate": ["A2"]
        });

        let f = normalize_record(&record, 3, FlightKind::Arrival, &ctx(Locale::Fr)).unwrap();
        assert_eq!(f.id, "arr-3");
        assert_eq!(f.flight_number, "N/A");
        assert_eq!(f.airline, "Compagnie inconnue");
        assert_eq!(f.route, "NOS");
        assert_eq!(f.arrival_time, None);
        assert_eq!(f.status, FlightStatus::Scheduled);
        assert_eq!(f.status_label, "Programmé");
        assert_eq!(f.gate, "-");
        assert_eq!(f.terminal, "-");
    }

    #[test]
    fn test_non_object_record_is_skipped() {
        assert!(normalize_record(&json!("MD 701"), 0, FlightKind::Arrival, &ctx(Locale::Fr)).is_none());
    }

    #[test]
    fn test_numeric_flight_number() {
        let record = json!({ "flightNumber": 701 });
        let f = normalize_record(&record, 0, FlightKind::Departure, &ctx(Locale::Fr)).unwrap();
        assert_eq!(f.flight_number, "701");
        assert_eq!(f.route, "N/A");
    }
}
