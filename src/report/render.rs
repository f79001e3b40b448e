use error_stack::{Result, ResultExt};
use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

use super::{Report, Status};

/// Output format of a rendered [`Report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Html,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to render report")]
pub struct RenderError;

impl Report {
    pub fn render(&self, format: Format) -> Result<String, RenderError> {
        match format {
            Format::Text => self.render_text().change_context(RenderError),
            Format::Html => self.render_html().change_context(RenderError),
            Format::Json => self.render_json().change_context(RenderError),
        }
    }

    fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn render_text(&self) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();
        for section in self.sections() {
            if !section.name.is_empty() {
                writeln!(out, "{}", section.name)?;
            }
            for row in &section.rows {
                writeln!(out, "  [{}] {}", row.status, row.label)?;
                if let Some(message) = &row.message {
                    writeln!(out, "         {message}")?;
                }
            }
        }

        let summary = self.summary();
        write!(
            out,
            "{} passed, {} warnings, {} failed",
            summary.pass, summary.warn, summary.fail
        )?;
        Ok(out)
    }

    // Same layout the tracker's own check page uses.
    fn render_html(&self) -> std::result::Result<String, fmt::Error> {
        let mut out = String::from("<table class=\"table table-bordered table-condensed\">\n");
        for section in self.sections() {
            if !section.name.is_empty() {
                writeln!(
                    out,
                    "<thead><tr><th colspan=\"2\" class=\"thead1\">{}</th></tr></thead>",
                    escape_html(&section.name)
                )?;
            }
            for row in &section.rows {
                let label = escape_html(&row.label);
                write!(out, "<tr><td class=\"description\">{label}")?;
                if let Some(message) = &row.message {
                    write!(out, "<br /><i>{}</i>", escape_html(message))?;
                }
                let (class, text) = match row.status {
                    Status::Pass => ("alert-success", "GOOD"),
                    Status::Warn => ("alert-warning", "WARN"),
                    Status::Fail => ("alert-danger", "BAD"),
                };
                writeln!(out, "</td><td class=\"alert {class}\">{text}</td></tr>")?;
            }
        }
        out.push_str("</table>");
        Ok(out)
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Message, Severity};

    fn sample() -> Report {
        let mut report = Report::new();
        report.section("Email");
        report.test_row(Severity::Fail, "addresses are fine", true, "hidden");
        report.test_row(
            Severity::Warn,
            "validation <on>",
            false,
            "turn it on & retry",
        );
        report.test_row(Severity::Fail, "signup needs mail", false, Message::None);
        report
    }

    #[test]
    fn parse_format() {
        assert_eq!("text".parse::<Format>(), Ok(Format::Text));
        assert_eq!("HTML".parse::<Format>(), Ok(Format::Html));
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert!("yaml".parse::<Format>().is_err());
    }

    #[test]
    fn text() {
        let output = sample().render(Format::Text).unwrap();
        assert_eq!(
            output,
            "Email\n\
             \x20 [PASS] addresses are fine\n\
             \x20 [WARN] validation <on>\n\
             \x20        turn it on & retry\n\
             \x20 [FAIL] signup needs mail\n\
             1 passed, 1 warnings, 1 failed"
        );
    }

    #[test]
    fn html_is_escaped() {
        let output = sample().render(Format::Html).unwrap();
        let header = r#"<th colspan="2" class="thead1">Email</th>"#;
        let warned = "validation &lt;on&gt;<br /><i>turn it on &amp; retry</i>";
        assert!(output.contains(header));
        assert!(output.contains(warned));
        assert!(output.contains("<td class=\"alert alert-danger\">BAD</td>"));
        assert!(output.contains("<td class=\"alert alert-success\">GOOD</td>"));
        assert!(!output.contains("hidden"));
    }

    #[test]
    fn json() {
        let output = sample().render(Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let rows = &value["sections"][0]["rows"];
        assert_eq!(value["sections"][0]["name"], "Email");
        assert_eq!(rows[0]["status"], "pass");
        assert!(rows[0].get("message").is_none());
        assert_eq!(rows[1]["status"], "warn");
        assert_eq!(rows[1]["message"], "turn it on & retry");
        assert_eq!(rows[2]["status"], "fail");
    }
}
