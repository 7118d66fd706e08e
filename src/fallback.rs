//! Ordered source fallback with a static terminal value.
//!
//! A [`ResilientFetcher`] tries its sources strictly in order, one at a
//! time, and returns the first one that both answers and normalizes. When
//! every live source has failed it returns the static fallback dataset, so
//! [`ResilientFetcher::fetch_normalized`] has no error path at all.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::SourceError;
use crate::model::{FetchContext, Fetched, Provenance};

/// One live provider: its requests plus the normalizer for its payload.
#[async_trait]
pub trait Source<T>: Send + Sync {
    /// Stable name for logs.
    fn name(&self) -> &str;

    /// Fetches and normalizes. Any transport, status or shape problem is an
    /// error; partial data the normalizer can tolerate is not.
    async fn fetch(&self, ctx: &FetchContext) -> Result<T, SourceError>;
}

/// Builds the static fallback value for a context.
pub type FallbackFn<T> = Box<dyn Fn(&FetchContext) -> T + Send + Sync>;

pub struct ResilientFetcher<T> {
    domain: &'static str,
    sources: Vec<Arc<dyn Source<T>>>,
    fallback: FallbackFn<T>,
}

impl<T> ResilientFetcher<T> {
    /// A fetcher with no live sources yet. Until one is added every fetch
    /// resolves to `fallback`.
    pub fn new(
        domain: &'static str,
        fallback: impl Fn(&FetchContext) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            domain,
            sources: Vec::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Appends a source. The first one added is the primary.
    pub fn with_source(mut self, source: Arc<dyn Source<T>>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// The value returned when every live source fails.
    pub fn fallback(&self, ctx: &FetchContext) -> T {
        (self.fallback)(ctx)
    }

    /// Produces a normalized value, never an error.
    #[tracing::instrument(skip(self, ctx), fields(domain = self.domain, locale = %ctx.locale))]
    pub async fn fetch_normalized(&self, ctx: &FetchContext) -> Fetched<T> {
        for (rank, source) in self.sources.iter().enumerate() {
            match source.fetch(ctx).await {
                Ok(value) => {
                    let provenance = if rank == 0 {
                        Provenance::Primary
                    } else {
                        Provenance::Alternate(rank)
                    };
                    info!(source = source.name(), %provenance, "Source answered");
                    return Fetched {
                        value,
                        provenance,
                        source: source.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!(
                        source = source.name(),
                        kind = e.kind(),
                        error = %e,
                        message = %e.operator_message(),
                        "Source failed, trying next"
                    );
                }
            }
        }

        warn!(
            sources = self.sources.len(),
            "All live sources failed, serving static data"
        );
        Fetched {
            value: self.fallback(ctx),
            provenance: Provenance::StaticFallback,
            source: "static".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use chrono::{Datelike, FixedOffset, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        name: &'static str,
        answer: Option<u32>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(name: &'static str, answer: Option<u32>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Source<u32> for Canned {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<u32, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.ok_or(SourceError::Empty("canned"))
        }
    }

    fn ctx() -> FetchContext {
        FetchContext::new(
            Locale::Fr,
            NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
            FixedOffset::east_opt(3 * 3600).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_primary_short_circuits() {
        let primary = Canned::new("primary", Some(1));
        let alternate = Canned::new("alternate", Some(2));
        let fetcher = ResilientFetcher::new("test", |_| 0u32)
            .with_source(primary.clone())
            .with_source(alternate.clone());

        let fetched = fetcher.fetch_normalized(&ctx()).await;

        assert_eq!(fetched.value, 1);
        assert_eq!(fetched.provenance, Provenance::Primary);
        assert_eq!(alternate.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_alternates_tried_in_order() {
        let primary = Canned::new("primary", None);
        let second = Canned::new("second", None);
        let third = Canned::new("third", Some(3));
        let fetcher = ResilientFetcher::new("test", |_| 0u32)
            .with_source(primary.clone())
            .with_source(second.clone())
            .with_source(third.clone());

        let fetched = fetcher.fetch_normalized(&ctx()).await;

        assert_eq!(fetched.value, 3);
        assert_eq!(fetched.provenance, Provenance::Alternate(2));
        assert_eq!(fetched.source, "third");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_fallback() {
        let fetcher = ResilientFetcher::new("test", |c: &FetchContext| c.today.year() as u32)
            .with_source(Canned::new("primary", None));

        let fetched = fetcher.fetch_normalized(&ctx()).await;

        assert_eq!(fetched.value, 2025);
        assert_eq!(fetched.provenance, Provenance::StaticFallback);
    }

    #[tokio::test]
    async fn test_no_sources_goes_straight_to_fallback() {
        let fetcher = ResilientFetcher::new("test", |_| 42u32);
        assert!(fetcher.source_names().is_empty());

        let fetched = fetcher.fetch_normalized(&ctx()).await;
        assert_eq!(fetched.value, 42);
        assert_eq!(fetched.provenance, Provenance::StaticFallback);
    }
}
