// Login controller - Exchanges credentials for a session
use crate::application::api_client::ApiClient;
use crate::application::failure::Failure;
use crate::application::notification_queue::NotificationQueue;
use crate::application::session_store::SessionStore;
use crate::domain::route::Route;
use crate::domain::session::Credentials;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    /// Inline form error
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Email or password missing
    Ignored,
    Busy,
    Authenticated(Route),
    Failed(Failure),
}

pub struct LoginController {
    api: Arc<dyn ApiClient>,
    session: Arc<SessionStore>,
    notifications: Arc<NotificationQueue>,
    state: watch::Sender<LoginState>,
}

impl LoginController {
    pub fn new(
        api: Arc<dyn ApiClient>,
        session: Arc<SessionStore>,
        notifications: Arc<NotificationQueue>,
    ) -> Self {
        Self {
            api,
            session,
            notifications,
            state: watch::Sender::new(LoginState::Idle),
        }
    }

    pub async fn submit(&self, credentials: Credentials) -> LoginOutcome {
        if !credentials.is_complete() {
            return LoginOutcome::Ignored;
        }

        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if *state == LoginState::Submitting {
                return false;
            }
            *state = LoginState::Submitting;
            accepted = true;
            true
        });
        if !accepted {
            return LoginOutcome::Busy;
        }

        match self.api.login(&credentials).await {
            Ok(response) => {
                self.state.send_replace(LoginState::Idle);
                LoginOutcome::Authenticated(self.session.establish(response.user, response.token))
            }
            Err(e) => {
                let failure = Failure::Authentication(e);
                tracing::warn!("Login as {} failed: {}", credentials.email, failure);
                let message = failure.user_message().unwrap_or_default();
                self.state.send_replace(LoginState::Failed(message));
                if let Some(notification) = failure.notification() {
                    self.notifications.push(notification);
                }
                LoginOutcome::Failed(failure)
            }
        }
    }

    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        *self.state.borrow() == LoginState::Submitting
    }

    /// Forget an inline error, e.g. when the form is shown again.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, LoginState::Failed(_)) {
                *state = LoginState::Idle;
                true
            } else {
                false
            }
        });
    }
}
