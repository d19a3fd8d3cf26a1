// Presentation layer - HTTP surface over the dashboard store
pub mod app_state;
pub mod handlers;
