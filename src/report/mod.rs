//! Collects the outcome of every check into sections of rows.
//!
//! A check is one boolean assertion. The [`Severity`] passed along
//! with it decides whether a false assertion is a failure or only a
//! warning, and [`Message`] decides what gets shown next to the row.

use serde::Serialize;
use std::fmt;

mod render;
pub use render::{Format, RenderError};

/// What a false assertion is reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fail,
    Warn,
}

impl Severity {
    /// Fails when `fail` is set, warns otherwise.
    pub const fn fail_if(fail: bool) -> Self {
        if fail {
            Self::Fail
        } else {
            Self::Warn
        }
    }

    pub const fn status(self, passed: bool) -> Status {
        match (passed, self) {
            (true, _) => Status::Pass,
            (false, Self::Warn) => Status::Warn,
            (false, Self::Fail) => Status::Fail,
        }
    }
}

/// Outcome of a single row, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Warn => f.write_str("WARN"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}

/// Extra information displayed next to a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Message {
    #[default]
    None,
    /// Only shown when the assertion does not hold.
    OnFailure(String),
    /// Picked by the outcome of the assertion.
    ByOutcome {
        pass: Option<String>,
        fail: Option<String>,
    },
}

impl Message {
    pub fn resolve(&self, passed: bool) -> Option<&str> {
        match self {
            Self::None => None,
            Self::OnFailure(message) => (!passed).then_some(message.as_str()),
            Self::ByOutcome { pass, fail } => {
                if passed {
                    pass.as_deref()
                } else {
                    fail.as_deref()
                }
            }
        }
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::OnFailure(value)
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::OnFailure(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.pass + self.warn + self.fail
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new section. Rows recorded afterwards belong to it.
    pub fn section(&mut self, name: impl Into<String>) {
        self.sections.push(Section {
            name: name.into(),
            rows: Vec::new(),
        });
    }

    /// Records the outcome of one check in the current section.
    ///
    /// Rows recorded before any [`Report::section`] call land in an
    /// untitled section.
    pub fn test_row(
        &mut self,
        severity: Severity,
        label: impl Into<String>,
        passed: bool,
        message: impl Into<Message>,
    ) -> Status {
        let label = label.into();
        let status = severity.status(passed);
        let message = message.into().resolve(passed).map(str::to_string);

        match status {
            Status::Pass => tracing::debug!(%status, "{label}"),
            Status::Warn | Status::Fail => {
                tracing::info!(%status, message = message.as_deref(), "{label}");
            }
        }

        if self.sections.is_empty() {
            self.section("");
        }

        if let Some(section) = self.sections.last_mut() {
            section.rows.push(Row {
                label,
                status,
                message,
            });
        }

        status
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.sections.iter().flat_map(|section| section.rows.iter())
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for row in self.rows() {
            match row.status {
                Status::Pass => summary.pass += 1,
                Status::Warn => summary.warn += 1,
                Status::Fail => summary.fail += 1,
            }
        }
        summary
    }

    /// The worst status of every row, [`Status::Pass`] if empty.
    pub fn status(&self) -> Status {
        self.rows()
            .map(|row| row.status)
            .max()
            .unwrap_or(Status::Pass)
    }

    pub fn has_failures(&self) -> bool {
        self.status() == Status::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Report: Send, Sync);

    #[test]
    fn severity_decides_failed_status() {
        assert_eq!(Severity::Fail.status(true), Status::Pass);
        assert_eq!(Severity::Warn.status(true), Status::Pass);
        assert_eq!(Severity::Fail.status(false), Status::Fail);
        assert_eq!(Severity::Warn.status(false), Status::Warn);

        assert_eq!(Severity::fail_if(true), Severity::Fail);
        assert_eq!(Severity::fail_if(false), Severity::Warn);
    }

    #[test]
    fn message_resolution() {
        let message = Message::from("broken");
        assert_eq!(message.resolve(true), None);
        assert_eq!(message.resolve(false), Some("broken"));

        let message = Message::ByOutcome {
            pass: Some("fine".into()),
            fail: None,
        };
        assert_eq!(message.resolve(true), Some("fine"));
        assert_eq!(message.resolve(false), None);

        assert_eq!(Message::None.resolve(false), None);
    }

    #[test]
    fn rows_go_to_current_section() {
        let mut report = Report::new();
        report.test_row(Severity::Fail, "orphan", true, Message::None);
        report.section("Email");
        report.test_row(Severity::Fail, "first", true, "not shown");
        report.test_row(Severity::Warn, "second", false, "shown");

        let sections = report.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "");
        assert_eq!(sections[0].rows.len(), 1);
        assert_eq!(sections[1].name, "Email");
        assert_eq!(
            sections[1].rows,
            vec![
                Row {
                    label: "first".into(),
                    status: Status::Pass,
                    message: None,
                },
                Row {
                    label: "second".into(),
                    status: Status::Warn,
                    message: Some("shown".into()),
                },
            ]
        );
    }

    #[test]
    fn summary_and_overall_status() {
        let mut report = Report::new();
        assert_eq!(report.status(), Status::Pass);

        report.section("Email");
        report.test_row(Severity::Fail, "a", true, Message::None);
        report.test_row(Severity::Warn, "b", false, Message::None);
        assert_eq!(report.status(), Status::Warn);
        assert!(!report.has_failures());

        report.test_row(Severity::Fail, "c", false, Message::None);
        assert_eq!(report.status(), Status::Fail);
        assert!(report.has_failures());

        let summary = report.summary();
        assert_eq!(
            summary,
            Summary {
                pass: 1,
                warn: 1,
                fail: 1,
            }
        );
        assert_eq!(summary.total(), 3);
    }
}
