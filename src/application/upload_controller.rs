// Upload controller - Drives a single dataset upload
use crate::application::api_client::ApiClient;
use crate::application::failure::Failure;
use crate::application::lifetime::ViewLifetime;
use crate::application::notification_queue::NotificationQueue;
use crate::domain::dataset::{Dataset, DatasetFile};
use std::sync::Arc;
use tokio::sync::watch;

pub const UPLOAD_SUCCESS: &str = "Dataset uploaded successfully";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading { previous: Option<Dataset> },
    Ready(Dataset),
    /// Retryable. `previous` is the dataset from before the failed attempt.
    Failed { previous: Option<Dataset> },
}

impl UploadState {
    /// The dataset a training run may use. Only `Ready` qualifies.
    pub fn ready_dataset(&self) -> Option<&Dataset> {
        match self {
            UploadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Most recent accepted dataset, for display.
    pub fn last_dataset(&self) -> Option<&Dataset> {
        match self {
            UploadState::Idle => None,
            UploadState::Ready(dataset) => Some(dataset),
            UploadState::Uploading { previous } | UploadState::Failed { previous } => {
                previous.as_ref()
            }
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No file was selected
    Ignored,
    /// An upload is already in flight
    Busy,
    Uploaded(Dataset),
    Failed(Failure),
    /// The owning view was torn down before the response arrived
    Discarded,
}

pub struct UploadController {
    api: Arc<dyn ApiClient>,
    notifications: Arc<NotificationQueue>,
    lifetime: ViewLifetime,
    state: watch::Sender<UploadState>,
}

impl UploadController {
    pub fn new(
        api: Arc<dyn ApiClient>,
        notifications: Arc<NotificationQueue>,
        lifetime: ViewLifetime,
    ) -> Self {
        Self {
            api,
            notifications,
            lifetime,
            state: watch::Sender::new(UploadState::Idle),
        }
    }

    pub async fn submit(&self, file: Option<DatasetFile>) -> SubmitOutcome {
        let Some(file) = file else {
            return SubmitOutcome::Ignored;
        };

        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.is_uploading() {
                return false;
            }
            let previous = state.last_dataset().cloned();
            *state = UploadState::Uploading { previous };
            accepted = true;
            true
        });
        if !accepted {
            tracing::debug!("Upload of {} ignored, another upload is in flight", file.filename);
            return SubmitOutcome::Busy;
        }

        tracing::debug!("Uploading {} ({} bytes)", file.filename, file.bytes.len());
        let result = self.api.upload(&file).await;

        if !self.lifetime.is_active() {
            tracing::debug!("Discarding upload result for {}, view is gone", file.filename);
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(dataset) => {
                tracing::info!("Dataset {} uploaded", dataset.filename);
                self.state.send_replace(UploadState::Ready(dataset.clone()));
                self.notifications.success(UPLOAD_SUCCESS);
                SubmitOutcome::Uploaded(dataset)
            }
            Err(e) => {
                let failure = Failure::Upload(e);
                tracing::warn!("{}", failure);
                self.state.send_modify(|state| {
                    let previous = state.last_dataset().cloned();
                    *state = UploadState::Failed { previous };
                });
                if let Some(notification) = failure.notification() {
                    self.notifications.push(notification);
                }
                SubmitOutcome::Failed(failure)
            }
        }
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn ready_dataset(&self) -> Option<Dataset> {
        self.state.borrow().ready_dataset().cloned()
    }

    /// Whether the upload affordance is enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.borrow().is_uploading()
    }
}
