use chrono::NaiveTime;

use super::{Flight, FlightKind, FlightStatus, sort_by_board_time};
use crate::i18n::strings;
use crate::model::{FetchContext, NormalizedSeries};

// id, flight number, route, departure, arrival, gate, kind
type Row = (&'static str, &'static str, &'static str, (u32, u32), (u32, u32), &'static str, FlightKind);

const SCHEDULE: [Row; 8] = [
    ("MD701", "MD 701", "Antananarivo (TNR)", (8, 30), (9, 45), "A1", FlightKind::Departure),
    ("MD702", "MD 702", "Nosy Be (NOS)", (10, 15), (11, 0), "A2", FlightKind::Departure),
    ("MD703", "MD 703", "Diego Suarez (DIE)", (14, 20), (15, 10), "A1", FlightKind::Departure),
    ("MD704", "MD 704", "Antananarivo (TNR)", (16, 45), (18, 0), "A2", FlightKind::Departure),
    ("MD705", "MD 705", "Toliara (TLE)", (18, 30), (19, 45), "A1", FlightKind::Departure),
    ("MD706", "MD 706", "Sainte-Marie (SMS)", (12, 0), (12, 45), "A2", FlightKind::Departure),
    ("MD701-arr", "MD 701", "Antananarivo (TNR)", (7, 0), (8, 15), "A1", FlightKind::Arrival),
    ("MD702-arr", "MD 702", "Nosy Be (NOS)", (9, 0), (9, 45), "A2", FlightKind::Arrival),
];

/// Illustrative Majunga (MJN) schedule based on the carrier's published
/// timetable, served when the live board is unavailable.
pub fn fallback(ctx: &FetchContext) -> NormalizedSeries<Flight> {
    let status = FlightStatus::Scheduled;
    let label = strings::flight_status(ctx.locale, status);

    let to_flight = |&(id, number, route, (dh, dm), (ah, am), gate, kind): &Row| Flight {
        id: id.to_string(),
        kind,
        airline: "Air Madagascar".to_string(),
        flight_number: number.to_string(),
        route: route.to_string(),
        departure_time: NaiveTime::from_hms_opt(dh, dm, 0),
        arrival_time: NaiveTime::from_hms_opt(ah, am, 0),
        status,
        status_label: label.to_string(),
        gate: gate.to_string(),
        terminal: "1".to_string(),
        aircraft: "AT7".to_string(),
        estimated_departure: None,
        estimated_arrival: None,
    };

    let [head, tail @ ..] = &SCHEDULE;
    let mut board = NormalizedSeries::with_head(to_flight(head), tail.iter().map(to_flight));
    sort_by_board_time(board.as_mut_slice());
    board
}
