pub mod check;
pub mod config;
pub mod database;
pub mod logging;
pub mod report;
pub mod schema;
pub mod util;

pub use check::EmailChecks;
pub use config::Settings;
pub use report::Report;
