// Application shell: session, current route and the active dashboard
use crate::application::api_client::ApiClient;
use crate::application::dashboard::Dashboard;
use crate::application::login_controller::{LoginController, LoginOutcome, LoginState};
use crate::application::notification_queue::NotificationQueue;
use crate::application::route_guard::RouteGuard;
use crate::application::session_store::SessionStore;
use crate::domain::route::{RequestedRoute, Route};
use crate::domain::session::{Credentials, Session};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct AppState {
    pub notifications: Arc<NotificationQueue>,
    session: Arc<SessionStore>,
    login: LoginController,
    api: Arc<dyn ApiClient>,
    metrics_interval: Duration,
    route: Route,
    dashboard: Option<Dashboard>,
}

impl AppState {
    /// Starts on the login route; call `navigate` with the initial path.
    pub fn new(
        api: Arc<dyn ApiClient>,
        session: Arc<SessionStore>,
        notifications: Arc<NotificationQueue>,
        metrics_interval: Duration,
    ) -> Self {
        let login = LoginController::new(api.clone(), session.clone(), notifications.clone());
        Self {
            notifications,
            session,
            login,
            api,
            metrics_interval,
            route: Route::Login,
            dashboard: None,
        }
    }

    /// The entered route, re-checked against the session as it is now.
    pub fn route(&self) -> Route {
        RouteGuard::settle(&self.route.into(), self.session.is_authenticated())
    }

    /// `None` once the session has ended, even before `refresh` runs.
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard
            .as_ref()
            .filter(|dashboard| dashboard.is_active() && self.session.is_authenticated())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    pub fn login_state(&self) -> LoginState {
        self.login.state()
    }

    /// Resolve `path` through the guard and enter the resulting view.
    pub fn navigate(&mut self, path: &str) -> Route {
        let requested = RequestedRoute::parse(path);
        let destination = RouteGuard::settle(&requested, self.session.is_authenticated());
        if requested != RequestedRoute::from(destination) {
            tracing::debug!("Redirecting {} to {}", path, destination.path());
        }
        self.enter(destination);
        destination
    }

    /// Re-run the guard for the entered route after a session change.
    pub fn refresh(&mut self) -> Route {
        let path = self.route.path();
        self.navigate(path)
    }

    fn enter(&mut self, route: Route) {
        match route {
            Route::Dashboard => {
                if self.dashboard.as_ref().is_some_and(|d| !d.is_active()) {
                    self.dashboard = None;
                }
                if self.dashboard.is_none() {
                    let dashboard = Dashboard::open(
                        self.api.clone(),
                        self.notifications.clone(),
                        self.metrics_interval,
                    );
                    dashboard.follow_session(self.session.subscribe());
                    self.dashboard = Some(dashboard);
                }
            }
            Route::Login => {
                if let Some(dashboard) = self.dashboard.take() {
                    dashboard.teardown();
                }
                if self.route != Route::Login {
                    self.login.reset();
                }
            }
        }
        self.route = route;
    }

    pub async fn login(&mut self, credentials: Credentials) -> LoginOutcome {
        let outcome = self.login.submit(credentials).await;
        if let LoginOutcome::Authenticated(route) = &outcome {
            self.navigate(route.path());
        }
        outcome
    }

    pub fn logout(&mut self) -> Route {
        let route = self.session.clear();
        self.navigate(route.path())
    }
}
