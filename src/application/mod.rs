// Application layer - Document store, history and notification use cases
pub mod auto_save;
pub mod dashboard_store;
pub mod error;
pub mod history;
pub mod notification_queue;
pub mod project_repository;
pub mod store_scope;
