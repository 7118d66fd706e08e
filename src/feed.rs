//! A refreshable, observable cell around a [`ResilientFetcher`].
//!
//! Every refresh draws a generation ticket before it starts fetching and only
//! publishes if no later refresh has started since. With overlapping fetches
//! (a locale switched twice in quick succession) the state therefore always
//! reflects the most recently requested locale, whatever order the network
//! answers in.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::FixedOffset;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::fallback::ResilientFetcher;
use crate::i18n::Locale;
use crate::model::{FetchContext, Fetched};

#[derive(Debug, Clone)]
pub struct FeedState<T> {
    /// Last published value. `None` until the first refresh completes.
    pub data: Option<Fetched<T>>,
    pub loading: bool,
    /// Ticket of the refresh that produced `data`.
    pub generation: u64,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            generation: 0,
        }
    }
}

pub struct LiveFeed<T> {
    fetcher: Arc<ResilientFetcher<T>>,
    offset: FixedOffset,
    tx: watch::Sender<FeedState<T>>,
    requested: AtomicU64,
}

impl<T> LiveFeed<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(fetcher: Arc<ResilientFetcher<T>>, offset: FixedOffset) -> Self {
        let (tx, _rx) = watch::channel(FeedState::default());
        Self {
            fetcher,
            offset,
            tx,
            requested: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> FeedState<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState<T>> {
        self.tx.subscribe()
    }

    /// Fetches for `ctx` and publishes the result unless a newer refresh
    /// was requested meanwhile. Returns whether the result was applied.
    pub async fn refresh(&self, ctx: FetchContext) -> bool {
        let ticket = self.start();
        self.run(ticket, ctx).await
    }

    /// Refreshes once for the current locale, then once per locale change.
    ///
    /// Change-triggered refreshes are spawned rather than awaited, so a slow
    /// fetch never delays reacting to the next change.
    pub fn follow_locale(self: Arc<Self>, mut locales: watch::Receiver<Locale>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let locale = *locales.borrow_and_update();
            self.refresh(FetchContext::now(locale, self.offset)).await;

            while locales.changed().await.is_ok() {
                let locale = *locales.borrow_and_update();
                info!(domain = self.fetcher.domain(), %locale, "Locale changed, refetching");
                let ticket = self.start();
                let feed = Arc::clone(&self);
                tokio::spawn(async move {
                    let ctx = FetchContext::now(locale, feed.offset);
                    feed.run(ticket, ctx).await;
                });
            }
            debug!(domain = self.fetcher.domain(), "Locale source closed");
        })
    }

    fn start(&self) -> u64 {
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_modify(|state| state.loading = true);
        ticket
    }

    async fn run(&self, ticket: u64, ctx: FetchContext) -> bool {
        let fetched = self.fetcher.fetch_normalized(&ctx).await;

        let applied = self.tx.send_if_modified(|state| {
            if ticket != self.requested.load(Ordering::SeqCst) {
                return false;
            }
            state.data = Some(fetched);
            state.loading = false;
            state.generation = ticket;
            true
        });

        if !applied {
            debug!(
                domain = self.fetcher.domain(),
                ticket,
                locale = %ctx.locale,
                "Dropping stale result"
            );
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::fallback::Source;
    use crate::i18n::LocaleProvider;
    use crate::model::Provenance;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Answers with the locale's index; French waits for the gate when gated.
    struct ByLocale {
        gated: bool,
        gate: Notify,
        calls: AtomicUsize,
    }

    impl ByLocale {
        fn new(gated: bool) -> Arc<Self> {
            Arc::new(Self {
                gated,
                gate: Notify::new(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Source<usize> for ByLocale {
        fn name(&self) -> &str {
            "by-locale"
        }

        async fn fetch(&self, ctx: &FetchContext) -> Result<usize, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gated && ctx.locale == Locale::Fr {
                self.gate.notified().await;
            }
            Ok(Locale::ALL.iter().position(|l| *l == ctx.locale).unwrap_or(99))
        }
    }

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn ctx(locale: Locale) -> FetchContext {
        FetchContext::new(locale, NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(), offset())
    }

    fn feed(source: Arc<ByLocale>) -> Arc<LiveFeed<usize>> {
        let fetcher = ResilientFetcher::new("test", |_| 99usize).with_source(source);
        Arc::new(LiveFeed::new(Arc::new(fetcher), offset()))
    }

    #[tokio::test]
    async fn test_refresh_publishes() {
        let feed = feed(ByLocale::new(false));
        assert!(feed.snapshot().data.is_none());

        assert!(feed.refresh(ctx(Locale::En)).await);

        let state = feed.snapshot();
        let data = state.data.unwrap();
        assert_eq!(data.value, 1);
        assert_eq!(data.provenance, Provenance::Primary);
        assert!(!state.loading);
        assert_eq!(state.generation, 1);
    }

    #[tokio::test]
    async fn test_stale_completion_is_dropped() {
        let source = ByLocale::new(true);
        let feed = feed(source.clone());

        let slow = Arc::clone(&feed);
        let ticket = feed.start();
        let pending = tokio::spawn(async move { slow.run(ticket, ctx(Locale::Fr)).await });

        assert!(feed.refresh(ctx(Locale::It)).await);
        source.gate.notify_one();
        assert!(!pending.await.unwrap());

        let state = feed.snapshot();
        assert_eq!(state.data.unwrap().value, 2);
        assert_eq!(state.generation, 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loading_stays_set_while_newer_refresh_pending() {
        let source = ByLocale::new(true);
        let feed = feed(source.clone());

        assert!(feed.refresh(ctx(Locale::En)).await);
        let ticket = feed.start();
        assert!(feed.snapshot().loading);

        let slow = Arc::clone(&feed);
        let pending = tokio::spawn(async move { slow.run(ticket, ctx(Locale::Fr)).await });
        source.gate.notify_one();
        assert!(pending.await.unwrap());
        assert!(!feed.snapshot().loading);
    }

    #[tokio::test]
    async fn test_one_refetch_per_locale_change() {
        let source = ByLocale::new(false);
        let feed = feed(source.clone());
        let locales = LocaleProvider::new(Locale::En);
        let updates = feed.subscribe();

        let handle = Arc::clone(&feed).follow_locale(locales.subscribe());

        let wait = |n: u64| {
            let mut rx = updates.clone();
            async move {
                tokio::time::timeout(
                    Duration::from_secs(5),
                    rx.wait_for(|s| s.generation == n && !s.loading),
                )
                .await
                .expect("feed did not publish in time")
                .map(|s| s.data.as_ref().map(|d| d.value))
                .unwrap()
            }
        };

        assert_eq!(wait(1).await, Some(1));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        assert!(locales.set(Locale::It));
        assert_eq!(wait(2).await, Some(2));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        // Same locale again is not a change.
        assert!(!locales.set(Locale::It));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        drop(locales);
        handle.await.unwrap();
    }
}
