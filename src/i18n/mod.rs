//! Locale selection and change notification.
//!
//! Human-readable fields are produced in the caller's locale at
//! normalization time, either by asking the provider for that language or
//! by looking the value up in [`strings`]. A locale change therefore means a
//! new fetch: [`LocaleProvider`] is what consumers subscribe to for that.

pub mod strings;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Languages the site is translated into. French is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
    It,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Fr, Locale::En, Locale::It];

    /// Two-letter language code (`lang=` style parameters).
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
            Locale::It => "it",
        }
    }

    /// BCP 47 tag with region (`locale=` style parameters).
    pub fn bcp47(&self) -> &'static str {
        match self {
            Locale::Fr => "fr-FR",
            Locale::En => "en-GB",
            Locale::It => "it-IT",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    /// Accepts `fr`, `FR`, `fr-FR`, `en_US` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "fr" => Ok(Locale::Fr),
            "en" => Ok(Locale::En),
            "it" => Ok(Locale::It),
            _ => Err(anyhow::anyhow!("unsupported locale '{s}'")),
        }
    }
}

/// Holds the current locale and notifies subscribers when it changes.
#[derive(Debug, Clone)]
pub struct LocaleProvider {
    tx: watch::Sender<Locale>,
}

impl LocaleProvider {
    pub fn new(initial: Locale) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Locale {
        *self.tx.borrow()
    }

    /// Switches locale. Subscribers are only woken by an actual change.
    /// Returns whether the locale changed.
    pub fn set(&self, locale: Locale) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == locale {
                false
            } else {
                *current = locale;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.tx.subscribe()
    }
}

impl Default for LocaleProvider {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_variants() {
        assert_eq!("fr".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("it-IT".parse::<Locale>().unwrap(), Locale::It);
        assert_eq!("en_US".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn test_codes() {
        assert_eq!(Locale::Fr.code(), "fr");
        assert_eq!(Locale::Fr.bcp47(), "fr-FR");
        assert_eq!(Locale::default(), Locale::Fr);
    }

    #[tokio::test]
    async fn test_provider_notifies_only_on_change() {
        let provider = LocaleProvider::new(Locale::Fr);
        let mut rx = provider.subscribe();

        assert!(!provider.set(Locale::Fr));
        assert!(!rx.has_changed().unwrap());

        assert!(provider.set(Locale::En));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Locale::En);
        assert_eq!(provider.current(), Locale::En);
    }
}
