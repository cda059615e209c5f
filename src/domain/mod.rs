// Domain layer - Plain data shared by every other layer
pub mod dataset;
pub mod metrics;
pub mod notification;
pub mod route;
pub mod session;
pub mod training;
