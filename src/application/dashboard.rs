// Dashboard - Owns the per-view controllers and their lifetime
use crate::application::api_client::ApiClient;
use crate::application::lifetime::ViewLifetime;
use crate::application::metrics_poller::MetricsPoller;
use crate::application::notification_queue::NotificationQueue;
use crate::application::training_controller::TrainingController;
use crate::application::upload_controller::UploadController;
use crate::domain::session::Session;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Dashboard {
    pub upload: Arc<UploadController>,
    pub training: Arc<TrainingController>,
    pub metrics: Arc<MetricsPoller>,
    lifetime: ViewLifetime,
    session_watch: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build the view's controllers and start metrics polling.
    pub fn open(
        api: Arc<dyn ApiClient>,
        notifications: Arc<NotificationQueue>,
        metrics_interval: Duration,
    ) -> Self {
        let lifetime = ViewLifetime::new();
        let upload = Arc::new(UploadController::new(
            api.clone(),
            notifications.clone(),
            lifetime.clone(),
        ));
        let training = Arc::new(TrainingController::new(
            api.clone(),
            upload.clone(),
            notifications,
            lifetime.clone(),
        ));
        let metrics = Arc::new(MetricsPoller::new(api, metrics_interval));
        metrics.start();

        tracing::debug!("Dashboard opened");
        Self {
            upload,
            training,
            metrics,
            lifetime,
            session_watch: Mutex::new(None),
        }
    }

    /// Close the view as soon as the session ends, whoever ends it.
    pub fn follow_session(&self, mut session: watch::Receiver<Option<Session>>) {
        let lifetime = self.lifetime.clone();
        let metrics = Arc::clone(&self.metrics);
        let handle = tokio::spawn(async move {
            // Resolves immediately if already signed out; errs if the store is gone
            let ended = session.wait_for(Option::is_none).await.is_ok();
            if ended && lifetime.is_active() {
                lifetime.end();
                metrics.stop();
                tracing::debug!("Session ended, dashboard closed");
            }
        });
        let previous = self
            .session_watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifetime.is_active()
    }

    /// Stop polling and drop any upload/train result still in flight.
    pub fn teardown(&self) {
        if let Some(handle) = self
            .session_watch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        if !self.lifetime.is_active() {
            return;
        }
        self.lifetime.end();
        self.metrics.stop();
        tracing::debug!("Dashboard torn down");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.teardown();
    }
}
