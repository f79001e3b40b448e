use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Logging {
    /// **Environment variable**: `TRACKERCHECK_LOG_STYLE`
    ///
    /// There are four styles to choose:
    /// - `compact` - compacts logs but it is readable enough
    /// - `full` - default formatter from [`tracing_subscriber`].
    /// - `pretty` - makes logs pretty
    /// - `json` - serializes logs into JSON data
    ///
    /// The default value is `compact`, if not set.
    pub style: LoggingStyle,

    /// **Environment variable**: `TRACKERCHECK_LOG_TARGETS`
    ///
    /// This property filters logging events with the use of directives.
    /// Falls back to `RUST_LOG` and then to `info`, if not set.
    ///
    /// You may refer on how directives work and parse and its examples by going to:
    /// <https://docs.rs/tracing-subscriber/0.3.18/tracing_subscriber/filter/struct.EnvFilter.html>
    pub targets: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingStyle {
    #[default]
    Compact,
    Full,
    Pretty,
    Json,
}
