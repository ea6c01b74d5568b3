use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::feed::{
    parse_feed_bytes, FeedFetcher, FetchError, FetchStatus, ParsedFeed, Validators,
};
use crate::core::incident::{format_timestamp, IncidentSnapshot};
use crate::core::storage::SnapshotStore;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// What one poll cycle produced before it is committed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Latest(IncidentSnapshot),
    NoEntries,
    NotModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Drives fetch → parse → select → normalize → extract → publish.
#[derive(Debug)]
pub struct Poller {
    fetcher: FeedFetcher,
    store: SnapshotStore,
    interval: Duration,
    validators: Validators,
}

impl Poller {
    pub fn new(fetcher: FeedFetcher, store: SnapshotStore, interval: Duration) -> Self {
        Self {
            fetcher,
            store,
            interval,
            validators: Validators::default(),
        }
    }

    /// Runs a single cycle and commits its result.
    pub async fn poll_once(&mut self) -> Result<PollOutcome, PollError> {
        let result = self.next_outcome(Utc::now()).await;
        self.commit(&result, Utc::now());
        result
    }

    /// Spawns the polling task: one cycle now, then one per interval.
    pub fn start(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        PollerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            feed_url = self.fetcher.url(),
            interval_secs = self.interval.as_secs_f64(),
            "poller started"
        );
        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                result = self.next_outcome(Utc::now()) => result,
            };
            if *shutdown.borrow() {
                break;
            }
            self.commit(&result, Utc::now());
        }

        tracing::info!("poller stopped");
    }

    async fn next_outcome(&mut self, polled_at: DateTime<Utc>) -> Result<PollOutcome, PollError> {
        let payload = match self.fetcher.fetch(&self.validators).await? {
            FetchStatus::NotModified => return Ok(PollOutcome::NotModified),
            FetchStatus::Updated(payload) => payload,
        };
        self.validators = payload.validators;

        let feed = parse_feed_bytes(&payload.body).unwrap_or_else(|error| {
            tracing::warn!(%error, "feed document could not be parsed, treating it as empty");
            ParsedFeed::default()
        });

        Ok(match feed.latest() {
            Some(latest) => PollOutcome::Latest(IncidentSnapshot::from_entry(latest, polled_at)),
            None => PollOutcome::NoEntries,
        })
    }

    fn commit(&self, result: &Result<PollOutcome, PollError>, checked_at: DateTime<Utc>) {
        let checked_at = format_timestamp(checked_at);
        match result {
            Ok(PollOutcome::Latest(snapshot)) => {
                let published = self.store.publish(snapshot.clone(), checked_at);
                log_published(&published);
            }
            Ok(PollOutcome::NoEntries) => {
                tracing::warn!(%checked_at, "feed has no entries, keeping previous incident");
                self.store.mark_checked(checked_at);
            }
            Ok(PollOutcome::NotModified) => {
                tracing::debug!(%checked_at, "feed not modified");
                self.store.mark_checked(checked_at);
            }
            Err(error) => {
                tracing::error!(%error, %checked_at, feed_url = self.fetcher.url(), "polling error");
                self.store.mark_checked(checked_at);
            }
        }
    }
}

fn log_published(snapshot: &Arc<IncidentSnapshot>) {
    tracing::info!(
        time = %snapshot.time,
        product = %snapshot.product,
        status = %snapshot.status,
        link = %snapshot.link,
        "incident snapshot published"
    );
}

/// Owner of a running poller. Dropping it also stops the task, at its next
/// suspension point, but without waiting for it.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn state(&self) -> SchedulerState {
        if self.task.is_finished() {
            SchedulerState::Stopped
        } else {
            SchedulerState::Running
        }
    }

    /// Cancels the pending wait or fetch and waits for the task to exit.
    pub async fn stop(self) {
        self.shutdown.send_replace(true);
        if let Err(error) = self.task.await {
            tracing::error!(%error, "poller task ended abnormally");
        }
    }
}
