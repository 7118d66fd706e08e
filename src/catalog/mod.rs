//! Public tour catalogue and airport shuttle timetable.
//!
//! Both live in the hosted table store that the admin backoffice edits;
//! the public site only reads the active rows.

mod fallback;
mod postgrest;

pub use fallback::{shuttle_fallback, tour_fallback};
pub use postgrest::{ShuttleTable, TableStore, TourTable};

use chrono::NaiveTime;
use serde::Serialize;

use crate::model::serialize_clock;

pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    pub id: u32,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    pub duration: String,
    pub price: f64,
    pub currency: String,
    pub images: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShuttleSchedule {
    pub id: u32,
    #[serde(serialize_with = "serialize_clock")]
    pub departure_time: Option<NaiveTime>,
    #[serde(serialize_with = "serialize_clock")]
    pub arrival_time: Option<NaiveTime>,
    pub from: String,
    pub to: String,
    pub price: f64,
    pub currency: String,
    pub available_seats: u32,
}

impl Tour {
    /// Flat view for CSV, with list fields joined by `|`.
    pub fn record(&self) -> TourRecord<'_> {
        TourRecord {
            id: self.id,
            title: &self.title,
            short_description: &self.short_description,
            duration: &self.duration,
            price: self.price,
            currency: &self.currency,
            images: self.images.join("|"),
            highlights: self.highlights.join("|"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TourRecord<'a> {
    pub id: u32,
    pub title: &'a str,
    pub short_description: &'a str,
    pub duration: &'a str,
    pub price: f64,
    pub currency: &'a str,
    pub images: String,
    pub highlights: String,
}

/// Cuts a description down to `max` characters followed by `...`.
pub fn summarize(text: &str, max: usize) -> String {
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}
