//! Weather widget data: current conditions plus a four-day forecast.
//!
//! Two live providers feed the same [`WeatherReport`] shape:
//! [`OpenWeatherMap`] (primary, localized by the provider) and
//! [`OpenMeteo`] (alternate, localized through the lookup tables). All
//! unit conversion happens here, once.

mod fallback;
mod openmeteo;
mod openweather;

pub use fallback::fallback;
pub use openmeteo::OpenMeteo;
pub use openweather::OpenWeatherMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::i18n::strings;
use crate::model::{FetchContext, NormalizedSeries};

/// Number of forecast slots: today plus three days.
pub const FORECAST_DAYS: u64 = 4;

/// Hour of the day whose reading represents the whole day.
pub const REPRESENTATIVE_HOUR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: WeatherObservation,
    pub forecast: NormalizedSeries<WeatherObservation>,
}

/// One normalized reading. Temperatures are rounded °C, wind is km/h.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    pub temperature: i32,
    pub description: String,
    pub icon: String,
    pub humidity: i32,
    pub wind_speed: i32,
    pub feels_like: i32,
    pub pressure: Option<i32>,
    /// Kilometres.
    pub visibility: Option<i32>,
    /// `"Today"` or `"<weekday> <day>"`; `None` for current conditions.
    pub date: Option<String>,
    pub day_name: Option<String>,
}

/// Canonical sky condition, keyed by WMO weather interpretation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    Drizzle,
    DenseDrizzle,
    LightRain,
    Rain,
    HeavyRain,
    LightSnow,
    Snow,
    HeavySnow,
    Thunderstorm,
    Unknown,
}

impl Condition {
    /// Unmapped codes become [`Condition::Unknown`].
    pub fn from_wmo(code: i64) -> Self {
        match code {
            0 => Condition::Clear,
            1 => Condition::MainlyClear,
            2 => Condition::PartlyCloudy,
            3 => Condition::Overcast,
            45 => Condition::Fog,
            48 => Condition::RimeFog,
            51 => Condition::LightDrizzle,
            53 => Condition::Drizzle,
            55 => Condition::DenseDrizzle,
            61 => Condition::LightRain,
            63 => Condition::Rain,
            65 => Condition::HeavyRain,
            71 => Condition::LightSnow,
            73 => Condition::Snow,
            75 => Condition::HeavySnow,
            95 => Condition::Thunderstorm,
            _ => Condition::Unknown,
        }
    }

    /// Icon code in the primary provider's icon set. Unknown shows clear sky.
    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear | Condition::Unknown => "01d",
            Condition::MainlyClear | Condition::PartlyCloudy => "02d",
            Condition::Overcast => "03d",
            Condition::Fog | Condition::RimeFog => "50d",
            Condition::LightDrizzle | Condition::Drizzle | Condition::DenseDrizzle => "09d",
            Condition::LightRain | Condition::Rain | Condition::HeavyRain => "10d",
            Condition::LightSnow | Condition::Snow | Condition::HeavySnow => "13d",
            Condition::Thunderstorm => "11d",
        }
    }
}

pub fn ms_to_kmh(speed: f64) -> i32 {
    (speed * 3.6).round() as i32
}

pub fn round_celsius(temp: f64) -> i32 {
    temp.round() as i32
}

/// Day label and day name for a forecast date.
pub fn day_label(ctx: &FetchContext, date: NaiveDate) -> (String, String) {
    if date == ctx.today {
        let today = strings::today(ctx.locale).to_string();
        return (today.clone(), today);
    }
    let abbrev = strings::weekday_abbrev(ctx.locale, date.weekday());
    (format!("{abbrev} {}", date.day()), abbrev.to_string())
}

/// Dates covered by the forecast, starting today.
pub fn forecast_dates(ctx: &FetchContext) -> impl Iterator<Item = NaiveDate> + '_ {
    (0..FORECAST_DAYS).filter_map(|offset| ctx.today.checked_add_days(chrono::Days::new(offset)))
}

/// Picks the record representing one day out of that day's records.
///
/// The record at [`REPRESENTATIVE_HOUR`] wins; without one, the record at the
/// middle index of the subset is used, whatever its hour.
pub fn select_representative<T>(day: &[T], hour_of: impl Fn(&T) -> u32) -> Option<&T> {
    day.iter()
        .find(|r| hour_of(r) == REPRESENTATIVE_HOUR)
        .or_else(|| day.get(day.len() / 2))
}
