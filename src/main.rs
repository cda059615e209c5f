// Main entry point - Dependency injection and headless dashboard session
use std::sync::Arc;

use anyhow::Context;
use modelsphere_client::application::api_client::ApiClient;
use modelsphere_client::application::notification_queue::NotificationQueue;
use modelsphere_client::application::session_store::{SessionStorage, SessionStore};
use modelsphere_client::domain::dataset::DatasetFile;
use modelsphere_client::domain::route::Route;
use modelsphere_client::domain::session::Credentials;
use modelsphere_client::domain::training::Algorithm;
use modelsphere_client::infrastructure::config::{load_client_config, WorkflowSettings};
use modelsphere_client::infrastructure::file_storage::FileStorage;
use modelsphere_client::infrastructure::http_api_client::HttpApiClient;
use modelsphere_client::infrastructure::memory_storage::MemoryStorage;
use modelsphere_client::presentation::app_state::AppState;
use modelsphere_client::presentation::evaluation::EvaluationView;
use modelsphere_client::presentation::metrics_grid::MetricsGrid;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_client_config().context("Failed to load client configuration")?;

    // Infrastructure
    let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(
        config.api.base_url.clone(),
        config.api.timeout_secs.map(std::time::Duration::from_secs),
    )?);
    let storage: Arc<dyn SessionStorage> = match &config.storage.path {
        Some(path) => Arc::new(FileStorage::new(path)),
        None => Arc::new(MemoryStorage::new()),
    };

    // Application
    let session = Arc::new(SessionStore::hydrate(storage));
    let notifications = Arc::new(NotificationQueue::new(config.timing.notification_ttl()));
    let mut app = AppState::new(
        api,
        session,
        notifications.clone(),
        config.timing.metrics_interval(),
    );

    tracing::info!("Connecting to {}", config.api.base_url);
    if app.navigate("/dashboard") == Route::Login {
        let Some(login) = &config.login else {
            anyhow::bail!("No stored session and no [login] credentials configured");
        };
        app.login(Credentials::new(login.email.clone(), login.password.clone()))
            .await;
        if app.route() != Route::Dashboard {
            anyhow::bail!("Login failed: {:?}", app.login_state());
        }
    }

    let mut notification_rx = notifications.subscribe();
    tokio::spawn(async move {
        while notification_rx.changed().await.is_ok() {
            if let Some(n) = notification_rx.borrow_and_update().clone() {
                tracing::info!("[{:?}] {}", n.kind, n.message);
            }
        }
    });

    run_workflow(&app, &config.workflow).await?;

    let Some(dashboard) = app.dashboard() else {
        anyhow::bail!("Dashboard is not active");
    };
    let mut metrics_rx = dashboard.metrics.subscribe();
    let training = dashboard.training.clone();
    let mut session_rx = app.subscribe_session();

    loop {
        tokio::select! {
            changed = session_rx.changed() => {
                if changed.is_err() || app.refresh() == Route::Login {
                    tracing::warn!("Session ended, leaving the dashboard");
                    break;
                }
            }
            changed = metrics_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = metrics_rx.borrow_and_update().clone();
                let result = training.displayed_result();
                let grid = MetricsGrid::build(&snapshot.metrics, result.as_ref());
                tracing::info!(
                    "requests={} load={} memory={} accuracy={} status={} audits={} privacy={}",
                    grid.total_requests,
                    grid.system_load,
                    snapshot.metrics.memory,
                    grid.model_accuracy,
                    grid.model_status,
                    grid.privacy_audits,
                    grid.privacy_score
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    if let Some(dashboard) = app.dashboard() {
        dashboard.teardown();
    }
    Ok(())
}

/// Optional upload-then-train run driven by `[workflow]` settings.
async fn run_workflow(app: &AppState, workflow: &WorkflowSettings) -> anyhow::Result<()> {
    let (Some(path), Some(dashboard)) = (&workflow.dataset, app.dashboard()) else {
        return Ok(());
    };

    let file = DatasetFile::from_path(path).await?;
    dashboard.upload.submit(Some(file)).await;

    if let Some(name) = &workflow.algorithm {
        let algorithm: Algorithm = name.parse()?;
        dashboard.training.select(algorithm);
    }
    dashboard.training.start_selected().await;

    if let Some(view) = dashboard
        .training
        .displayed_result()
        .as_ref()
        .and_then(EvaluationView::build)
    {
        tracing::info!("Confusion matrix over {:?}", view.matrix.column_headers);
        for row in &view.matrix.rows {
            let counts: Vec<u64> = row.cells.iter().map(|c| c.count).collect();
            tracing::info!("  {:>4} {:?}", row.header, counts);
        }
        for report in &view.report {
            tracing::info!(
                "  {} precision={} recall={} f1={}",
                report.class_name,
                report.precision,
                report.recall,
                report.f1
            );
        }
    }
    Ok(())
}
