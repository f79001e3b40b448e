use error_stack::{Report, Result};
use serde::Deserialize;
use std::path::Path;

use super::{Database, EmailOptions, LoadError, Logging};
use crate::util::figment::FigmentErrorAttachable;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Email options of the audited tracker.
    #[serde(default)]
    pub email: EmailOptions,
    /// You can refer `database` field as `db` to make it easier to type.
    #[serde(alias = "db")]
    pub database: Database,
    #[serde(default)]
    pub logging: Logging,
}

impl Settings {
    pub const DEFAULT_CONFIG_FILE: &'static str = "trackercheck.toml";

    /// Loads the configuration from the given TOML file (or
    /// `trackercheck.toml` in the current directory if it exists)
    /// and environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, LoadError> {
        dotenvy::dotenv().ok();

        if let Some(file) = file {
            if !file.is_file() {
                return Err(Report::new(LoadError)
                    .attach_printable(format!("could not find config file {}", file.display())));
            }
        }

        let config = Self::figment(file)
            .extract::<Self>()
            .map_err(|e| Report::new(LoadError).attach_figment_error(e))?;

        config.database.validate()?;
        Ok(config)
    }

    /// Creates a [`Figment`] object to load the configuration.
    /// This function is there for [`Settings::load`] and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment(file: Option<&Path>) -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        let file = file.unwrap_or_else(|| Path::new(Self::DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Toml::file(file))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL"])
                    .map(|_| "database.url".into()),
            )
            // Most option names carry underscores so a plain split
            // on `_` would nest them too deep.
            .merge(Env::prefixed("TRACKERCHECK_").map(|v| {
                let key = v.as_str().to_ascii_lowercase();
                let sections = [
                    ("email_", "email"),
                    ("db_", "database"),
                    ("log_", "logging"),
                ];
                for (prefix, section) in sections {
                    if let Some(option) = key.strip_prefix(prefix) {
                        return format!("{section}.{option}").into();
                    }
                }
                key.into()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingStyle;
    use figment::Jail;

    #[test]
    fn defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/bugs");

            let config: Settings = Settings::figment(None).extract()?;
            assert_eq!(config.email, EmailOptions::default());
            assert_eq!(config.database.url, "postgres://localhost/bugs");
            assert_eq!(config.database.user_table(), "mantis_user_table");
            assert!(config.database.enforce_tls);
            assert_eq!(config.logging.style, LoggingStyle::Compact);

            Ok(())
        });
    }

    #[test]
    fn from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                Settings::DEFAULT_CONFIG_FILE,
                r#"
                [email]
                webmaster_email = "webmaster@tracker.org"
                allow_signup = false

                [database]
                url = "postgres://tracker@localhost/bugs"
                table_prefix = ""
                "#,
            )?;

            let config: Settings = Settings::figment(None).extract()?;
            assert_eq!(config.email.webmaster_email, "webmaster@tracker.org");
            assert_eq!(config.email.from_email, "noreply@example.com");
            assert!(!config.email.allow_signup);
            assert!(config.email.send_reset_password);
            assert_eq!(config.database.user_table(), "user_table");

            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [email]
                from_email = "bugs@tracker.org"
                email_ensure_unique = true

                [database]
                url = "postgres://localhost/from_file"
                "#,
            )?;

            jail.set_env("DATABASE_URL", "postgres://localhost/from_alias");
            jail.set_env("TRACKERCHECK_DB_URL", "postgres://localhost/from_env");
            jail.set_env("TRACKERCHECK_DB_TABLE_PREFIX", "bt");
            jail.set_env("TRACKERCHECK_DB_TIMEOUT_SECS", "30");
            jail.set_env("TRACKERCHECK_EMAIL_EMAIL_ENSURE_UNIQUE", "false");
            jail.set_env(
                "TRACKERCHECK_EMAIL_RETURN_PATH_EMAIL",
                "bounces@tracker.org",
            );
            jail.set_env("TRACKERCHECK_LOG_STYLE", "json");
            jail.set_env("TRACKERCHECK_LOG_TARGETS", "trackercheck=debug");

            let file = Path::new("custom.toml");
            let config: Settings = Settings::figment(Some(file)).extract()?;
            assert_eq!(config.email.from_email, "bugs@tracker.org");
            assert_eq!(config.email.return_path_email, "bounces@tracker.org");
            assert!(!config.email.email_ensure_unique);

            assert_eq!(config.database.url, "postgres://localhost/from_env");
            assert_eq!(config.database.user_table(), "bt_user_table");
            assert_eq!(config.database.timeout_secs.get(), 30);

            assert_eq!(config.logging.style, LoggingStyle::Json);
            assert_eq!(config.logging.targets, "trackercheck=debug");

            Ok(())
        });
    }

    #[test]
    fn load_validates() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "hello world!");
            assert!(Settings::load(None).is_err());

            jail.set_env("DATABASE_URL", "postgres://localhost/bugs");
            assert!(Settings::load(None).is_ok());

            jail.set_env("TRACKERCHECK_DB_TABLE_SUFFIX", "x; drop");
            assert!(Settings::load(None).is_err());

            Ok(())
        });
    }

    #[test]
    fn load_requires_existing_file() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/bugs");
            assert!(Settings::load(Some(Path::new("missing.toml"))).is_err());
            Ok(())
        });
    }
}
