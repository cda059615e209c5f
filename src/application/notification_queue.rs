// Notification queue - Single slot with an owned expiry timer
use crate::domain::notification::{Notification, NotificationKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

pub struct NotificationQueue {
    ttl: Duration,
    inner: Arc<Inner>,
}

struct Inner {
    slot: watch::Sender<Option<Notification>>,
    timer: Mutex<Timer>,
}

#[derive(Default)]
struct Timer {
    // Bumped on every show/dismiss so a stale timer can never clear a newer message
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Inner {
    fn timer(&self) -> MutexGuard<'_, Timer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, generation: u64) {
        let mut timer = self.timer();
        if timer.generation != generation {
            return;
        }
        timer.handle = None;
        if let Some(expired) = self.slot.send_replace(None) {
            tracing::debug!("Notification expired: {}", expired.message);
        }
    }
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Arc::new(Inner {
                slot: watch::Sender::new(None),
                timer: Mutex::new(Timer::default()),
            }),
        }
    }

    /// Replace whatever is showing and restart the expiry timer.
    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        let notification = Notification::new(message, kind);
        tracing::debug!("Notification ({:?}): {}", notification.kind, notification.message);

        let mut timer = self.inner.timer();
        timer.generation += 1;
        if let Some(previous) = timer.handle.take() {
            previous.abort();
        }
        self.inner.slot.send_replace(Some(notification));

        let generation = timer.generation;
        let inner = Arc::clone(&self.inner);
        let ttl = self.ttl;
        timer.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            inner.expire(generation);
        }));
    }

    pub fn push(&self, notification: Notification) {
        self.show(notification.message, notification.kind);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    /// Clear early and cancel the pending timer.
    pub fn dismiss(&self) {
        let mut timer = self.inner.timer();
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            handle.abort();
        }
        self.inner.slot.send_replace(None);
    }

    pub fn current(&self) -> Option<Notification> {
        self.inner.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.slot.subscribe()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.timer().handle.take() {
            handle.abort();
        }
    }
}
