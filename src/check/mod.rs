use thiserror::Error;

pub mod email;
pub use email::EmailChecks;

#[derive(Debug, Error)]
#[error("Failed to run configuration checks")]
pub struct CheckError;
