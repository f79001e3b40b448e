use clap::Parser;
use error_stack::Result;
use thiserror::Error;
use trackercheck::report::Status;

mod email;

/// Command line options for trackercheck.
#[derive(Debug, Parser)]
#[command(
    about = "Configuration health checks for the bug tracker",
    version,
    author,
    long_about
)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub fn run(self) -> Result<Outcome, RunError> {
        match self.subcommand {
            Subcommand::Email(args) => self::email::run(&args),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Email(self::email::EmailCommand),
}

#[derive(Debug, Error)]
#[error("Failed to run checks")]
pub struct RunError;

/// How the checks went, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Failed => 2,
        }
    }
}

impl From<Status> for Outcome {
    fn from(status: Status) -> Self {
        match status {
            Status::Pass | Status::Warn => Self::Passed,
            Status::Fail => Self::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use trackercheck::report::Format;

    #[test]
    fn parse_email_command() {
        let cli = Cli::try_parse_from([
            "trackercheck",
            "email",
            "--config",
            "/etc/tracker/check.toml",
            "--format",
            "json",
        ])
        .unwrap();

        let Subcommand::Email(args) = cli.subcommand;
        let config = Path::new("/etc/tracker/check.toml");
        assert_eq!(args.config.as_deref(), Some(config));
        assert_eq!(args.format, Format::Json);
    }

    #[test]
    fn format_defaults_to_text() {
        let cli = Cli::try_parse_from(["trackercheck", "email"]).unwrap();
        let Subcommand::Email(args) = cli.subcommand;
        assert_eq!(args.config, None);
        assert_eq!(args.format, Format::Text);
    }

    #[test]
    fn rejects_unknown_format() {
        let args = ["trackercheck", "email", "--format", "yaml"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn warnings_do_not_fail() {
        assert_eq!(Outcome::from(Status::Pass).exit_code(), 0);
        assert_eq!(Outcome::from(Status::Warn).exit_code(), 0);
        assert_eq!(Outcome::from(Status::Fail).exit_code(), 2);
    }
}
