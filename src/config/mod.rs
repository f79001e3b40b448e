use thiserror::Error;

mod database;
mod email;
mod logging;
mod settings;

pub use database::Database;
pub use email::EmailOptions;
pub use logging::{Logging, LoggingStyle};
pub use settings::Settings;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct LoadError;
