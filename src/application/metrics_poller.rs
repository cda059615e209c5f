// Metrics poller - Fixed-interval best-effort refresh of operational metrics
use crate::application::api_client::ApiClient;
use crate::application::failure::{Failure, Visibility};
use crate::domain::metrics::MetricsSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Diagnostic counters. Failures are only ever visible here and in logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub issued: u64,
    pub applied: u64,
    pub failed: u64,
    /// Responses dropped because a later tick was already applied
    pub stale: u64,
}

pub struct MetricsPoller {
    api: Arc<dyn ApiClient>,
    interval: Duration,
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    snapshot: watch::Sender<MetricsSnapshot>,
    issued: AtomicU64,
    applied: AtomicU64,
    failed: AtomicU64,
    stale: AtomicU64,
}

impl MetricsPoller {
    pub fn new(api: Arc<dyn ApiClient>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            shared: Arc::new(Shared {
                snapshot: watch::Sender::new(MetricsSnapshot::default()),
                issued: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                stale: AtomicU64::new(0),
            }),
            task: Mutex::new(None),
        }
    }

    fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch now, then on every interval until stopped. No-op if already running.
    pub fn start(&self) {
        let mut task = self.task();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let interval = self.interval;
        tracing::debug!("Starting metrics poller every {:?}", interval);

        *task = Some(tokio::spawn(async move {
            // First tick completes immediately
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = IntervalStream::new(ticker);
            // Dropping the set on abort cancels every in-flight fetch
            let mut in_flight = JoinSet::new();

            loop {
                tokio::select! {
                    Some(_) = ticks.next() => {
                        let tick = shared.issued.fetch_add(1, Ordering::SeqCst) + 1;
                        in_flight.spawn(Self::fetch(Arc::clone(&api), Arc::clone(&shared), tick));
                    }
                    Some(_) = in_flight.join_next() => {}
                }
            }
        }));
    }

    async fn fetch(api: Arc<dyn ApiClient>, shared: Arc<Shared>, tick: u64) {
        match api.metrics().await {
            Ok(metrics) => {
                // Check and write under the channel lock so ticks only move forward
                let applied = shared.snapshot.send_if_modified(|current| {
                    if current.tick >= tick {
                        return false;
                    }
                    *current = MetricsSnapshot::new(metrics, tick);
                    true
                });
                if applied {
                    shared.applied.fetch_add(1, Ordering::Relaxed);
                } else {
                    shared.stale.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Dropping metrics from tick {}, a later tick is showing", tick);
                }
            }
            Err(e) => {
                let failure = Failure::Metrics(e);
                debug_assert_eq!(failure.visibility(), Visibility::DiagnosticOnly);
                shared.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Tick {}: {}", tick, failure);
            }
        }
    }

    /// Cancel the interval and any fetch still in flight.
    pub fn stop(&self) {
        if let Some(handle) = self.task().take() {
            handle.abort();
            tracing::debug!("Metrics poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn stats(&self) -> PollerStats {
        PollerStats {
            issued: self.shared.issued.load(Ordering::SeqCst),
            applied: self.shared.applied.load(Ordering::Relaxed),
            failed: self.shared.failed.load(Ordering::Relaxed),
            stale: self.shared.stale.load(Ordering::Relaxed),
        }
    }
}

impl Drop for MetricsPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
