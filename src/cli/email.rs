use clap::Parser;
use error_stack::{Result, ResultExt};
use std::io::Write;
use std::path::PathBuf;

use trackercheck::database::Pool;
use trackercheck::report::Format;
use trackercheck::schema::PgUserStore;
use trackercheck::{logging, EmailChecks, Report, Settings};

use super::{Outcome, RunError};

/// Check the email configuration and look for duplicated addresses
#[derive(Debug, Parser)]
pub struct EmailCommand {
    /// Configuration file to load (defaults to `trackercheck.toml`)
    #[clap(long, short)]
    pub config: Option<PathBuf>,
    /// Report format: `text`, `html` or `json`
    #[clap(long, short, default_value = "text")]
    pub format: Format,
}

pub fn run(args: &EmailCommand) -> Result<Outcome, RunError> {
    let settings = Settings::load(args.config.as_deref())
        .change_context(RunError)?;
    logging::init(&settings.logging).change_context(RunError)?;
    tracing::debug!(?settings, "loaded configuration");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(RunError)
        .attach_printable("could not build tokio runtime")?;

    let mut report = Report::new();
    let checked = runtime.block_on(check(&settings, &mut report));

    let mut stdout = std::io::stdout().lock();
    finish(&report, args.format, checked, &mut stdout)
}

async fn check(settings: &Settings, report: &mut Report) -> Result<(), RunError> {
    let pool = Pool::new(&settings.database).change_context(RunError)?;
    let mut store = PgUserStore::new(pool, settings.database.user_table());

    let result = EmailChecks::new(&settings.email)
        .run(&mut store, report)
        .await;

    let connections = store.pool().connections();
    tracing::debug!(connections, "closing database pool");
    store.pool().close().await;

    result.change_context(RunError)
}

/// Writes the report out, even when the checks were cut short so the
/// rows recorded before the error are still shown.
fn finish<W: Write>(
    report: &Report,
    format: Format,
    checked: Result<(), RunError>,
    out: &mut W,
) -> Result<Outcome, RunError> {
    if checked.is_ok() || report.summary().total() > 0 {
        let output = report.render(format).change_context(RunError)?;
        writeln!(out, "{output}")
            .change_context(RunError)
            .attach_printable("could not write report")?;
    }

    checked?;
    Ok(Outcome::from(report.status()))
}
