// Application layer - Workflow orchestration over the remote service
pub mod api_client;
pub mod dashboard;
pub mod failure;
pub mod lifetime;
pub mod login_controller;
pub mod metrics_poller;
pub mod notification_queue;
pub mod route_guard;
pub mod session_store;
pub mod training_controller;
pub mod upload_controller;

#[cfg(test)]
pub(crate) mod testing;
