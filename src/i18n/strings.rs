//! Fixed locale-keyed lookup tables.

use chrono::Weekday;

use super::Locale;
use crate::flights::FlightStatus;
use crate::weather::Condition;

pub fn today(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Aujourd'hui",
        Locale::En => "Today",
        Locale::It => "Oggi",
    }
}

pub fn weekday_abbrev(locale: Locale, day: Weekday) -> &'static str {
    let idx = day.num_days_from_monday() as usize;
    match locale {
        Locale::Fr => ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"][idx],
        Locale::En => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][idx],
        Locale::It => ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab", "Dom"][idx],
    }
}

pub fn unknown_airline(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Compagnie inconnue",
        Locale::En => "Unknown airline",
        Locale::It => "Compagnia sconosciuta",
    }
}

pub fn flight_status(locale: Locale, status: FlightStatus) -> &'static str {
    use FlightStatus::*;
    match (locale, status) {
        (Locale::Fr, Scheduled) => "Programmé",
        (Locale::Fr, Delayed) => "Retardé",
        (Locale::Fr, Cancelled) => "Annulé",
        (Locale::Fr, Boarding) => "Embarquement",
        (Locale::Fr, Departed) => "Parti",
        (Locale::Fr, Arrived) => "Arrivé",
        (Locale::En, Scheduled) => "Scheduled",
        (Locale::En, Delayed) => "Delayed",
        (Locale::En, Cancelled) => "Cancelled",
        (Locale::En, Boarding) => "Boarding",
        (Locale::En, Departed) => "Departed",
        (Locale::En, Arrived) => "Arrived",
        (Locale::It, Scheduled) => "Programmato",
        (Locale::It, Delayed) => "In ritardo",
        (Locale::It, Cancelled) => "Cancellato",
        (Locale::It, Boarding) => "Imbarco",
        (Locale::It, Departed) => "Partito",
        (Locale::It, Arrived) => "Arrivato",
    }
}

pub fn condition(locale: Locale, condition: Condition) -> &'static str {
    use Condition::*;
    match locale {
        Locale::Fr => match condition {
            Clear => "Ciel dégagé",
            MainlyClear => "Peu nuageux",
            PartlyCloudy => "Partiellement nuageux",
            Overcast => "Couvert",
            Fog => "Brouillard",
            RimeFog => "Brouillard givrant",
            LightDrizzle => "Bruine légère",
            Drizzle => "Bruine modérée",
            DenseDrizzle => "Bruine dense",
            LightRain => "Pluie légère",
            Rain => "Pluie modérée",
            HeavyRain => "Pluie forte",
            LightSnow => "Neige légère",
            Snow => "Neige modérée",
            HeavySnow => "Neige forte",
            Thunderstorm => "Orage",
            Unknown => "Inconnu",
        },
        Locale::En => match condition {
            Clear => "Clear sky",
            MainlyClear => "Mainly clear",
            PartlyCloudy => "Partly cloudy",
            Overcast => "Overcast",
            Fog => "Fog",
            RimeFog => "Depositing rime fog",
            LightDrizzle => "Light drizzle",
            Drizzle => "Moderate drizzle",
            DenseDrizzle => "Dense drizzle",
            LightRain => "Light rain",
            Rain => "Moderate rain",
            HeavyRain => "Heavy rain",
            LightSnow => "Light snow",
            Snow => "Moderate snow",
            HeavySnow => "Heavy snow",
            Thunderstorm => "Thunderstorm",
            Unknown => "Unknown",
        },
        Locale::It => match condition {
            Clear => "Cielo sereno",
            MainlyClear => "Poco nuvoloso",
            PartlyCloudy => "Parzialmente nuvoloso",
            Overcast => "Coperto",
            Fog => "Nebbia",
            RimeFog => "Nebbia gelata",
            LightDrizzle => "Pioviggine leggera",
            Drizzle => "Pioviggine moderata",
            DenseDrizzle => "Pioviggine intensa",
            LightRain => "Pioggia leggera",
            Rain => "Pioggia moderata",
            HeavyRain => "Pioggia forte",
            LightSnow => "Neve leggera",
            Snow => "Neve moderata",
            HeavySnow => "Neve forte",
            Thunderstorm => "Temporale",
            Unknown => "Sconosciuto",
        },
    }
}

/// Descriptions used by the built-in weather dataset.
pub fn sunny(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Ensoleillé",
        Locale::En => "Sunny",
        Locale::It => "Soleggiato",
    }
}

pub fn cloudy(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Nuageux",
        Locale::En => "Cloudy",
        Locale::It => "Nuvoloso",
    }
}

pub fn rain(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Pluie",
        Locale::En => "Rain",
        Locale::It => "Pioggia",
    }
}
