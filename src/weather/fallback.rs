use super::{WeatherObservation, WeatherReport, day_label, forecast_dates};
use crate::i18n::strings;
use crate::model::{FetchContext, NormalizedSeries};

/// Built-in Majunga dry-season conditions, served when no provider answers.
pub fn fallback(ctx: &FetchContext) -> WeatherReport {
    let locale = ctx.locale;
    let current = WeatherObservation {
        temperature: 28,
        description: strings::sunny(locale).to_string(),
        icon: "01d".to_string(),
        humidity: 65,
        wind_speed: 12,
        feels_like: 30,
        pressure: Some(1013),
        visibility: Some(10),
        date: None,
        day_name: None,
    };

    // temperature, description, icon, humidity, wind, feels like
    let days = [
        (28, strings::sunny(locale), "01d", 65, 12, 30),
        (29, strings::sunny(locale), "01d", 60, 10, 31),
        (27, strings::cloudy(locale), "02d", 70, 15, 29),
        (26, strings::rain(locale), "10d", 80, 20, 28),
    ];

    let mut forecast = forecast_dates(ctx).zip(days).map(
        |(date, (temperature, description, icon, humidity, wind_speed, feels_like))| {
            let (label, day_name) = day_label(ctx, date);
            WeatherObservation {
                temperature,
                description: description.to_string(),
                icon: icon.to_string(),
                humidity,
                wind_speed,
                feels_like,
                pressure: None,
                visibility: None,
                date: Some(label),
                day_name: Some(day_name),
            }
        },
    );

    let head = forecast.next().unwrap_or_else(|| current.clone());
    WeatherReport {
        forecast: NormalizedSeries::with_head(head, forecast),
        current,
    }
}
