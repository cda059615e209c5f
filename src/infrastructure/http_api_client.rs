// HTTP implementation of the training service client
use crate::application::api_client::{ApiClient, ApiError};
use crate::domain::dataset::{Dataset, DatasetFile};
use crate::domain::metrics::Metrics;
use crate::domain::session::{Credentials, LoginResponse};
use crate::domain::training::{Algorithm, ModelResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    client: reqwest::Client,
}

/// Failure body the service sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct TrainRequest<'a> {
    algo: &'a str,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail: Self::extract_detail(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `{"detail": "..."}` yields the string. Structured details (validation
    /// error lists) are kept as compact JSON.
    fn extract_detail(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        tracing::debug!("POST /login as {}", credentials.email);
        self.execute(self.client.post(self.url("login")).json(credentials))
            .await
    }

    async fn upload(&self, file: &DatasetFile) -> Result<Dataset, ApiError> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ApiError::Network(format!("invalid content type: {e}")))?;
        }
        let form = Form::new().part("file", part);

        tracing::debug!("POST /upload {} ({} bytes)", file.filename, file.bytes.len());
        self.execute(self.client.post(self.url("upload")).multipart(form))
            .await
    }

    async fn train(&self, algorithm: Algorithm) -> Result<ModelResult, ApiError> {
        let body = TrainRequest {
            algo: algorithm.wire_name(),
        };
        tracing::debug!("POST /train algo={}", body.algo);
        self.execute(self.client.post(self.url("train")).json(&body))
            .await
    }

    async fn metrics(&self) -> Result<Metrics, ApiError> {
        self.execute(self.client.get(self.url("metrics"))).await
    }
}
