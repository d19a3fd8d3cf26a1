// Store error types
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A consumer reached for the store before it was installed or after it was torn down.
    #[error("dashboard store used outside its active scope ({0})")]
    OutsideScope(&'static str),
    #[error("project persistence failed: {0}")]
    Persistence(#[from] anyhow::Error),
}
