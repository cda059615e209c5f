// Client trait for the remote training service
use crate::domain::dataset::{Dataset, DatasetFile};
use crate::domain::metrics::Metrics;
use crate::domain::session::{Credentials, LoginResponse};
use crate::domain::training::{Algorithm, ModelResult};
use async_trait::async_trait;
use thiserror::Error;

/// Why a remote call did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request rejected with status {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ApiError {
    /// Server-supplied explanation, if the failure payload carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref().filter(|d| !d.trim().is_empty()),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Exchange credentials for a token and user profile
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Upload a dataset as multipart field `file`
    async fn upload(&self, file: &DatasetFile) -> Result<Dataset, ApiError>;

    /// Train against the dataset the service holds as active for this session
    async fn train(&self, algorithm: Algorithm) -> Result<ModelResult, ApiError>;

    async fn metrics(&self) -> Result<Metrics, ApiError>;
}
