// Domain layer - Pure document data
pub mod component;
pub mod dashboard;
pub mod ids;
pub mod notification;
pub mod session;
