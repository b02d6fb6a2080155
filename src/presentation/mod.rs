// Presentation layer - HTTP routes over the chart services
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod router;
pub mod session;
