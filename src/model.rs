//! Normalized result shapes shared by every domain.

use std::fmt;

use chrono::{FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};

use crate::i18n::Locale;

/// Sentinel for a text field the provider did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel for optional display fields (gate, terminal, aircraft).
pub const NOT_APPLICABLE: &str = "-";

/// Ordered, non-empty sequence of normalized observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedSeries<T>(Vec<T>);

impl<T> NormalizedSeries<T> {
    /// Returns `None` for an empty input.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self(items))
        }
    }

    /// Infallible constructor for data known to be non-empty.
    pub fn with_head(head: T, tail: impl IntoIterator<Item = T>) -> Self {
        let mut items = vec![head];
        items.extend(tail);
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Mutable view for in-place reordering; the length cannot change.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    pub fn first(&self) -> &T {
        &self.0[0]
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<'a, T> IntoIterator for &'a NormalizedSeries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which source produced a fetched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Primary,
    /// Alternate source, ranked from 1 in fallback order.
    Alternate(usize),
    StaticFallback,
}

impl Provenance {
    pub fn is_live(&self) -> bool {
        !matches!(self, Provenance::StaticFallback)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Primary => write!(f, "primary"),
            Provenance::Alternate(rank) => write!(f, "alternate-{rank}"),
            Provenance::StaticFallback => write!(f, "static-fallback"),
        }
    }
}

/// A normalized value together with the source that produced it.
///
/// Only `value` is serialized; provenance is for logs and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fetched<T> {
    pub value: T,
    #[serde(skip)]
    pub provenance: Provenance,
    #[serde(skip)]
    pub source: String,
}

/// Per-invocation inputs every source and fallback needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchContext {
    pub locale: Locale,
    /// Calendar day considered "today" at the destination.
    pub today: NaiveDate,
    /// Destination offset from UTC, used to bucket timestamps into days.
    pub offset: FixedOffset,
}

impl FetchContext {
    pub fn new(locale: Locale, today: NaiveDate, offset: FixedOffset) -> Self {
        Self {
            locale,
            today,
            offset,
        }
    }

    /// Context for the current wall-clock day at `offset`.
    pub fn now(locale: Locale, offset: FixedOffset) -> Self {
        let today = Utc::now().with_timezone(&offset).date_naive();
        Self::new(locale, today, offset)
    }
}

/// Serializes an optional clock time as `HH:MM`, or `N/A` when absent.
pub fn serialize_clock<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_clock(*time))
}

pub fn format_clock(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_rejects_empty() {
        assert!(NormalizedSeries::<u8>::new(vec![]).is_none());
        let series = NormalizedSeries::new(vec![1, 2, 3]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(*series.first(), 1);
    }

    #[test]
    fn test_provenance_display() {
        assert_eq!(Provenance::Primary.to_string(), "primary");
        assert_eq!(Provenance::Alternate(1).to_string(), "alternate-1");
        assert!(!Provenance::StaticFallback.is_live());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(NaiveTime::from_hms_opt(8, 5, 0)), "08:05");
        assert_eq!(format_clock(None), "N/A");
    }

    #[test]
    fn test_fetched_serializes_value_only() {
        let fetched = Fetched {
            value: NormalizedSeries::new(vec![1, 2]).unwrap(),
            provenance: Provenance::Primary,
            source: "test".into(),
        };
        assert_eq!(serde_json::to_string(&fetched).unwrap(), "[1,2]");
    }
}
