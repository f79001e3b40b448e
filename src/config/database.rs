use error_stack::{Report, Result};
use serde::Deserialize;
use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};

use super::LoadError;
use crate::util::validation::{is_postgres_url, is_valid_table_affix};

/// Configuration for connecting to the tracker's Postgres database.
#[derive(Clone, Deserialize)]
pub struct Database {
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_DB_URL` or `DATABASE_URL`
    pub url: String,
    /// Prefix of every tracker table, joined to the table name with
    /// an underscore unless it is empty.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_DB_TABLE_PREFIX`
    #[serde(default = "Database::default_table_prefix")]
    pub table_prefix: String,
    /// **Environment variables**:
    /// - `TRACKERCHECK_DB_TABLE_SUFFIX`
    #[serde(default = "Database::default_table_suffix")]
    pub table_suffix: String,
    /// Maximum amount of pool size that database can handle
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// How long the checker can wait until the database connection
    /// is successfully established.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Prefer TLS encrypted database connections (if possible).
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_DB_ENFORCE_TLS`
    #[serde(default = "Database::default_enforce_tls")]
    pub enforce_tls: bool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 1;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    /// Full name of the tracker's user table.
    pub fn user_table(&self) -> String {
        self.table("user")
    }

    /// Resolves a bare table name into `<prefix>_<name><suffix>`.
    pub fn table(&self, name: &str) -> String {
        let mut table = if self.table_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{name}", self.table_prefix)
        };
        table.push_str(&self.table_suffix);
        table
    }

    pub(crate) fn validate(&self) -> Result<(), LoadError> {
        if !is_postgres_url(&self.url) {
            return Err(Report::new(LoadError)
                .attach_printable("database.url: Invalid Postgres connection URL"));
        }

        for (key, affix) in [
            ("table_prefix", &self.table_prefix),
            ("table_suffix", &self.table_suffix),
        ] {
            if !is_valid_table_affix(affix) {
                return Err(Report::new(LoadError).attach_printable(format!(
                    "database.{key}: only lower-case letters, digits and underscores are allowed"
                )));
            }
        }

        Ok(())
    }

    // Required by serde
    fn default_table_prefix() -> String {
        "mantis".into()
    }

    fn default_table_suffix() -> String {
        "_table".into()
    }

    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_enforce_tls() -> bool {
        true
    }
}

// The connection URL may carry credentials.
impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("url", &"<hidden>")
            .field("table_prefix", &self.table_prefix)
            .field("table_suffix", &self.table_suffix)
            .field("pool_size", &self.pool_size)
            .field("timeout_secs", &self.timeout_secs)
            .field("enforce_tls", &self.enforce_tls)
            .finish()
    }
}
