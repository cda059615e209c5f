// Training controller - Drives a training run against the ready dataset
use crate::application::api_client::ApiClient;
use crate::application::failure::Failure;
use crate::application::lifetime::ViewLifetime;
use crate::application::notification_queue::NotificationQueue;
use crate::application::upload_controller::UploadController;
use crate::domain::training::{Algorithm, ModelResult};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum TrainingState {
    Idle,
    Training { previous: Option<ModelResult> },
    Completed(ModelResult),
    /// `previous` keeps the last successful result on screen.
    Failed { previous: Option<ModelResult> },
}

impl TrainingState {
    /// The result the evaluation section should show.
    pub fn displayed_result(&self) -> Option<&ModelResult> {
        match self {
            TrainingState::Idle => None,
            TrainingState::Completed(result) => Some(result),
            TrainingState::Training { previous } | TrainingState::Failed { previous } => {
                previous.as_ref()
            }
        }
    }

    pub fn is_training(&self) -> bool {
        matches!(self, TrainingState::Training { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// No ready dataset, or a run is already in flight. No request was sent.
    Unavailable,
    Trained(ModelResult),
    Failed(Failure),
    Discarded,
}

pub struct TrainingController {
    api: Arc<dyn ApiClient>,
    upload: Arc<UploadController>,
    notifications: Arc<NotificationQueue>,
    lifetime: ViewLifetime,
    selected: Mutex<Algorithm>,
    state: watch::Sender<TrainingState>,
}

impl TrainingController {
    pub fn new(
        api: Arc<dyn ApiClient>,
        upload: Arc<UploadController>,
        notifications: Arc<NotificationQueue>,
        lifetime: ViewLifetime,
    ) -> Self {
        Self {
            api,
            upload,
            notifications,
            lifetime,
            selected: Mutex::new(Algorithm::default()),
            state: watch::Sender::new(TrainingState::Idle),
        }
    }

    pub fn select(&self, algorithm: Algorithm) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = algorithm;
    }

    pub fn selected(&self) -> Algorithm {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn start_selected(&self) -> StartOutcome {
        self.start(self.selected()).await
    }

    pub async fn start(&self, algorithm: Algorithm) -> StartOutcome {
        let Some(dataset) = self.upload.ready_dataset() else {
            tracing::debug!("Training with {} unavailable, no dataset is ready", algorithm);
            return StartOutcome::Unavailable;
        };

        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.is_training() {
                return false;
            }
            let previous = state.displayed_result().cloned();
            *state = TrainingState::Training { previous };
            accepted = true;
            true
        });
        if !accepted {
            tracing::debug!("Training with {} unavailable, a run is in flight", algorithm);
            return StartOutcome::Unavailable;
        }

        tracing::debug!("Training {} on {}", algorithm, dataset.filename);
        let result = self.api.train(algorithm).await;

        if !self.lifetime.is_active() {
            tracing::debug!("Discarding {} training result, view is gone", algorithm);
            return StartOutcome::Discarded;
        }

        match result {
            Ok(model) => {
                tracing::info!(
                    "Model trained using {}: accuracy={} status={}",
                    algorithm,
                    model.accuracy,
                    model.status
                );
                self.state.send_replace(TrainingState::Completed(model.clone()));
                self.notifications
                    .success(format!("Model trained using {}", algorithm.wire_name()));
                StartOutcome::Trained(model)
            }
            Err(e) => {
                let failure = Failure::Training(e);
                tracing::warn!("{}", failure);
                self.state.send_modify(|state| {
                    let previous = state.displayed_result().cloned();
                    *state = TrainingState::Failed { previous };
                });
                if let Some(notification) = failure.notification() {
                    self.notifications.push(notification);
                }
                StartOutcome::Failed(failure)
            }
        }
    }

    /// Whether the start action is enabled.
    pub fn can_start(&self) -> bool {
        self.upload.ready_dataset().is_some() && !self.state.borrow().is_training()
    }

    pub fn state(&self) -> TrainingState {
        self.state.borrow().clone()
    }

    pub fn displayed_result(&self) -> Option<ModelResult> {
        self.state.borrow().displayed_result().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrainingState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::failure::TRAINING_FALLBACK;
    use crate::application::testing::{network_error, rejected, sample_result, FakeApi};
    use crate::domain::dataset::DatasetFile;
    use crate::domain::notification::Notification;
    use std::time::Duration;

    struct Fixture {
        api: Arc<FakeApi>,
        upload: Arc<UploadController>,
        training: Arc<TrainingController>,
        notifications: Arc<NotificationQueue>,
        lifetime: ViewLifetime,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(FakeApi::new());
        let notifications = Arc::new(NotificationQueue::default());
        let lifetime = ViewLifetime::new();
        let upload = Arc::new(UploadController::new(
            api.clone(),
            notifications.clone(),
            lifetime.clone(),
        ));
        let training = Arc::new(TrainingController::new(
            api.clone(),
            upload.clone(),
            notifications.clone(),
            lifetime.clone(),
        ));
        Fixture {
            api,
            upload,
            training,
            notifications,
            lifetime,
        }
    }

    async fn upload_csv(upload: &UploadController) {
        upload
            .submit(Some(DatasetFile::new("data.csv", b"x,y\n".to_vec())))
            .await;
    }

    #[tokio::test]
    async fn test_start_without_dataset_sends_nothing() {
        let f = fixture();
        assert!(!f.training.can_start());
        assert_eq!(f.training.start(Algorithm::RandomForest).await, StartOutcome::Unavailable);
        assert_eq!(f.api.train_calls(), 0);
        assert_eq!(f.training.state(), TrainingState::Idle);
    }

    #[tokio::test]
    async fn test_start_after_failed_upload_sends_nothing() {
        let f = fixture();
        f.api.push_upload(Duration::ZERO, Err(network_error()));
        upload_csv(&f.upload).await;

        assert_eq!(f.training.start(Algorithm::DecisionTree).await, StartOutcome::Unavailable);
        assert_eq!(f.api.train_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_run_names_algorithm() {
        let f = fixture();
        upload_csv(&f.upload).await;
        assert!(f.training.can_start());

        let outcome = f.training.start(Algorithm::RandomForest).await;
        assert_eq!(outcome, StartOutcome::Trained(sample_result("95.0%")));
        assert_eq!(f.training.state(), TrainingState::Completed(sample_result("95.0%")));
        assert_eq!(
            f.notifications.current(),
            Some(Notification::success("Model trained using Random Forest"))
        );
        assert_eq!(*f.api.trained_with.lock().unwrap(), vec![Algorithm::RandomForest]);
    }

    #[tokio::test]
    async fn test_failed_retrain_keeps_prior_result() {
        let f = fixture();
        upload_csv(&f.upload).await;
        f.api.push_train(Duration::ZERO, Ok(sample_result("94.1%")));
        f.training.start(Algorithm::LogisticRegression).await;

        f.api.push_train(Duration::ZERO, Err(network_error()));
        let outcome = f.training.start(Algorithm::SupportVectorMachine).await;

        assert!(matches!(outcome, StartOutcome::Failed(Failure::Training(_))));
        assert_eq!(f.training.displayed_result(), Some(sample_result("94.1%")));
        assert_eq!(
            f.notifications.current(),
            Some(Notification::error(TRAINING_FALLBACK))
        );
    }

    #[tokio::test]
    async fn test_failure_detail_is_surfaced() {
        let f = fixture();
        upload_csv(&f.upload).await;
        f.api
            .push_train(Duration::ZERO, Err(rejected("Training error: could not convert string")));

        f.training.start(Algorithm::KNearestNeighbors).await;
        assert_eq!(f.training.state(), TrainingState::Failed { previous: None });
        assert_eq!(
            f.notifications.current(),
            Some(Notification::error("Training error: could not convert string"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_while_training_is_unavailable() {
        let f = fixture();
        upload_csv(&f.upload).await;
        f.api
            .push_train(Duration::from_millis(1000), Ok(sample_result("96.0%")));

        let running = tokio::spawn({
            let training = f.training.clone();
            async move { training.start(Algorithm::RandomForest).await }
        });
        tokio::task::yield_now().await;

        assert!(!f.training.can_start());
        assert_eq!(f.training.start(Algorithm::DecisionTree).await, StartOutcome::Unavailable);
        assert!(matches!(running.await.unwrap(), StartOutcome::Trained(_)));
        assert_eq!(f.api.train_calls(), 1);
    }

    #[tokio::test]
    async fn test_selected_algorithm_is_controller_data() {
        let f = fixture();
        upload_csv(&f.upload).await;
        assert_eq!(f.training.selected(), Algorithm::LogisticRegression);

        f.training.select(Algorithm::UnlearningProtocol);
        f.training.start_selected().await;
        assert_eq!(
            *f.api.trained_with.lock().unwrap(),
            vec![Algorithm::UnlearningProtocol]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_after_teardown_is_discarded() {
        let f = fixture();
        upload_csv(&f.upload).await;
        f.notifications.dismiss();
        f.api
            .push_train(Duration::from_millis(1000), Ok(sample_result("96.0%")));

        let running = tokio::spawn({
            let training = f.training.clone();
            async move { training.start(Algorithm::RandomForest).await }
        });
        tokio::task::yield_now().await;
        f.lifetime.end();

        assert_eq!(running.await.unwrap(), StartOutcome::Discarded);
        assert!(f.training.displayed_result().is_none());
        assert!(f.notifications.current().is_none());
    }
}
