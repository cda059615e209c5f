// Failure taxonomy for remote calls caught at the controller boundary
use crate::application::api_client::ApiError;
use crate::domain::notification::Notification;
use thiserror::Error;

pub const LOGIN_FALLBACK: &str = "Login failed - Check connection";
pub const UPLOAD_FALLBACK: &str = "Upload failed - check backend connection";
pub const TRAINING_FALLBACK: &str = "Training failed - check backend connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Shown to the operator as an error notification.
    UserFacing,
    /// Logged for diagnostics only.
    DiagnosticOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("authentication failed: {0}")]
    Authentication(#[source] ApiError),
    #[error("upload failed: {0}")]
    Upload(#[source] ApiError),
    #[error("training failed: {0}")]
    Training(#[source] ApiError),
    #[error("metrics refresh failed: {0}")]
    Metrics(#[source] ApiError),
}

impl Failure {
    pub fn visibility(&self) -> Visibility {
        match self {
            Failure::Metrics(_) => Visibility::DiagnosticOnly,
            _ => Visibility::UserFacing,
        }
    }

    pub fn api_error(&self) -> &ApiError {
        match self {
            Failure::Authentication(e)
            | Failure::Upload(e)
            | Failure::Training(e)
            | Failure::Metrics(e) => e,
        }
    }

    /// Text for the operator: the server detail when present, else a generic hint.
    pub fn user_message(&self) -> Option<String> {
        let fallback = match self {
            Failure::Authentication(_) => LOGIN_FALLBACK,
            Failure::Upload(_) => UPLOAD_FALLBACK,
            Failure::Training(_) => TRAINING_FALLBACK,
            Failure::Metrics(_) => return None,
        };
        Some(
            self.api_error()
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        )
    }

    pub fn notification(&self) -> Option<Notification> {
        match self.visibility() {
            Visibility::UserFacing => self.user_message().map(Notification::error),
            Visibility::DiagnosticOnly => None,
        }
    }
}
