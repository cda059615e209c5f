// Presentation layer - Application shell and render-ready view models
pub mod app_state;
pub mod evaluation;
pub mod metrics_grid;
pub mod panels;
