// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod http_response;
pub mod local_storage;
pub mod notification_surface;
pub mod project_store;
