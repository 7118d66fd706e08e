//! Output formatting and persistence for normalized feeds.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Renders a value as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Prints a value as pretty-printed JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Appends rows to a CSV file.
///
/// Creates the file with headers if it does not already exist. Rows must
/// serialize to flat records.
pub fn append_records<T: Serialize>(path: &str, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    let mut written = 0;
    for row in rows {
        writer.serialize(row)?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ShuttleSchedule, shuttle_fallback};
    use crate::i18n::Locale;
    use crate::model::FetchContext;
    use chrono::{FixedOffset, NaiveDate};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn shuttles() -> Vec<ShuttleSchedule> {
        let ctx = FetchContext::new(
            Locale::Fr,
            NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
            FixedOffset::east_opt(3 * 3600).unwrap(),
        );
        shuttle_fallback(&ctx).into_vec()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&shuttles());
    }

    #[test]
    fn test_to_json_uses_clock_format() {
        let json = to_json(&shuttles()[0]).unwrap();
        assert!(json.contains("\"departure_time\": \"08:00\""));
    }

    #[test]
    fn test_append_records_creates_file() {
        let path = temp_path("majunga_feeds_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let rows = shuttles();
        assert_eq!(append_records(&path, &rows).unwrap(), 8);

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("08:45"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let path = temp_path("majunga_feeds_test_header.csv");
        let _ = fs::remove_file(&path);

        let rows = shuttles();
        append_records(&path, &rows[..2]).unwrap();
        append_records(&path, &rows[2..3]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("available_seats")).count();
        assert_eq!(header_count, 1);
        // 1 header + 3 data rows
        assert_eq!(content.lines().count(), 4);

        fs::remove_file(&path).unwrap();
    }
}
