use error_stack::{Result, ResultExt};

use super::CheckError;
use crate::config::EmailOptions;
use crate::report::{Message, Report, Severity, Status};
use crate::schema::{DuplicateEmails, UserStore};
use crate::util::validation::is_placeholder_address;

pub const SECTION: &str = "Email";

/// Sanity checks of the tracker's email options.
#[derive(Debug, Clone, Copy)]
pub struct EmailChecks<'a> {
    options: &'a EmailOptions,
}

impl<'a> EmailChecks<'a> {
    pub fn new(options: &'a EmailOptions) -> Self {
        Self { options }
    }

    /// Runs every email check in order and records them under the
    /// `Email` section of the report.
    ///
    /// A failing lookup of duplicated addresses aborts the run, rows
    /// recorded until then stay in the report.
    #[tracing::instrument(skip_all)]
    pub async fn run<S>(&self, store: &mut S, report: &mut Report) -> Result<(), CheckError>
    where
        S: UserStore + ?Sized,
    {
        report.section(SECTION);
        self.check_options(report);

        let rows = store
            .duplicate_emails()
            .await
            .change_context(CheckError)
            .attach_printable("could not look up duplicated email addresses")?;

        let duplicates = DuplicateEmails::from_rows(rows);
        self.check_duplicates(&duplicates, report);

        Ok(())
    }

    /// Checks that only need the configuration.
    pub fn check_options(&self, report: &mut Report) {
        let options = self.options;

        for (option, email) in options.addresses() {
            report.test_row(
                Severity::Fail,
                format!("{option} configuration option has a valid email address specified"),
                !is_placeholder_address(email),
                Message::ByOutcome {
                    pass: None,
                    fail: Some(format!(
                        "You need to specify a valid email address for the {option} \
                         configuration option."
                    )),
                },
            );
        }

        report.test_row(
            Severity::Warn,
            "Email addresses are validated",
            options.validate_email,
            Message::ByOutcome {
                pass: None,
                fail: Some(
                    "You have disabled email validation checks. For security reasons it is \
                     suggested that you enable these validation checks."
                        .into(),
                ),
            },
        );

        report.test_row(
            Severity::Fail,
            "send_reset_password = ON requires allow_blank_email = OFF",
            !options.send_reset_password || !options.allow_blank_email,
            Message::None,
        );

        report.test_row(
            Severity::Fail,
            "send_reset_password = ON requires enable_email_notification = ON",
            !options.send_reset_password || options.enable_email_notification,
            Message::None,
        );

        report.test_row(
            Severity::Fail,
            "allow_signup = ON requires enable_email_notification = ON",
            !options.allow_signup || options.enable_email_notification,
            Message::None,
        );

        report.test_row(
            Severity::Fail,
            "allow_signup = ON requires send_reset_password = ON",
            !options.allow_signup || options.send_reset_password,
            Message::None,
        );
    }

    /// Duplicated addresses only fail the check when the tracker
    /// enforces unique addresses, otherwise they are a warning.
    pub fn check_duplicates(&self, duplicates: &DuplicateEmails, report: &mut Report) -> Status {
        report.test_row(
            Severity::fail_if(self.options.email_ensure_unique),
            "There are no duplicate email addresses, regardless of case",
            duplicates.is_empty(),
            format!("Duplicates found: {duplicates}"),
        )
    }
}
