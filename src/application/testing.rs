// Scripted ApiClient for controller tests
use crate::application::api_client::{ApiClient, ApiError};
use crate::domain::dataset::{Dataset, DatasetFile};
use crate::domain::metrics::Metrics;
use crate::domain::session::{Credentials, LoginResponse, UserProfile};
use crate::domain::training::{Algorithm, ClassReport, ModelResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Script<T> {
    replies: Mutex<VecDeque<(Duration, Result<T, ApiError>)>>,
    calls: AtomicUsize,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> Script<T> {
    fn push(&self, delay: Duration, reply: Result<T, ApiError>) {
        self.replies.lock().unwrap().push_back((delay, reply));
    }

    async fn next(&self, fallback: impl FnOnce() -> T) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.replies.lock().unwrap().pop_front();
        match scripted {
            Some((delay, reply)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => Ok(fallback()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Unscripted calls succeed with canned payloads.
#[derive(Default)]
pub(crate) struct FakeApi {
    login: Script<LoginResponse>,
    upload: Script<Dataset>,
    train: Script<ModelResult>,
    metrics: Script<Metrics>,
    pub trained_with: Mutex<Vec<Algorithm>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, reply: Result<LoginResponse, ApiError>) {
        self.login.push(Duration::ZERO, reply);
    }

    pub fn push_upload(&self, delay: Duration, reply: Result<Dataset, ApiError>) {
        self.upload.push(delay, reply);
    }

    pub fn push_train(&self, delay: Duration, reply: Result<ModelResult, ApiError>) {
        self.train.push(delay, reply);
    }

    pub fn push_metrics(&self, delay: Duration, reply: Result<Metrics, ApiError>) {
        self.metrics.push(delay, reply);
    }

    pub fn login_calls(&self) -> usize {
        self.login.calls()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload.calls()
    }

    pub fn train_calls(&self) -> usize {
        self.train.calls()
    }

    pub fn metrics_calls(&self) -> usize {
        self.metrics.calls()
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let email = credentials.email.clone();
        self.login
            .next(|| LoginResponse {
                token: "real-jwt-token".to_string(),
                user: UserProfile::new("Bharath").with_email(email).with_avatar("B"),
            })
            .await
    }

    async fn upload(&self, file: &DatasetFile) -> Result<Dataset, ApiError> {
        let filename = file.filename.clone();
        self.upload.next(|| Dataset::new(filename)).await
    }

    async fn train(&self, algorithm: Algorithm) -> Result<ModelResult, ApiError> {
        self.trained_with.lock().unwrap().push(algorithm);
        self.train.next(|| sample_result("95.0%")).await
    }

    async fn metrics(&self) -> Result<Metrics, ApiError> {
        self.metrics.next(|| sample_metrics(12_000)).await
    }
}

pub(crate) fn network_error() -> ApiError {
    ApiError::Network("connection refused".to_string())
}

pub(crate) fn rejected(detail: &str) -> ApiError {
    ApiError::Rejected {
        status: 400,
        detail: Some(detail.to_string()),
    }
}

pub(crate) fn sample_metrics(requests: u64) -> Metrics {
    Metrics {
        requests,
        cpu: "42%".to_string(),
        memory: "2.1 GB".to_string(),
        privacy_audits: 7,
    }
}

pub(crate) fn sample_result(accuracy: &str) -> ModelResult {
    let report_row = |class_name: &str| ClassReport {
        class_name: class_name.to_string(),
        precision: "0.95".to_string(),
        recall: "0.90".to_string(),
        f1: "0.92".to_string(),
    };
    ModelResult {
        accuracy: accuracy.to_string(),
        status: "Deployed".to_string(),
        privacy_score: "Medium".to_string(),
        confusion_matrix: Some(vec![vec![10, 0, 1], vec![0, 8, 2], vec![0, 0, 9]]),
        classes: Some(vec!["cat".into(), "dog".into(), "bird".into()]),
        report: Some(vec![report_row("cat"), report_row("dog"), report_row("bird")]),
    }
}
