//! Utilities for logging.

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable output, one line per event with file and line number.
    #[default]
    HumanReadable,
    /// One json object per event.
    Json,
}

impl LogFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HumanReadable => "human",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown log format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogFormat(pub String);

impl fmt::Display for UnknownLogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown log format '{}', expected 'human' or 'json'", self.0)
    }
}

impl std::error::Error for UnknownLogFormat {}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "human_readable" | "text" => Ok(LogFormat::HumanReadable),
            "json" => Ok(LogFormat::Json),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// Configure the global logger, reading additional directives from
/// `RUST_LOG`.
///
/// `default_level` is used for anything `RUST_LOG` doesn't mention.
///
/// Returns false if a global subscriber was already set.
pub fn configure_global_logger<W>(default_level: Level, format: LogFormat, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    install(env_filter, format, writer)
}

/// Configure the global logger from an explicit set of filter directives
/// (same syntax as `RUST_LOG`). Invalid directives are ignored.
///
/// Returns false if a global subscriber was already set.
pub fn configure_global_logger_with_directives<W>(
    directives: &str,
    format: LogFormat,
    writer: W,
) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::ERROR.into())
        .parse_lossy(directives);
    install(env_filter, format, writer)
}

/// Set up logging for tests. Output is captured by the test harness.
///
/// Safe to call multiple times.
pub fn configure_test_logger() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn install<W>(env_filter: EnvFilter, format: LogFormat, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(writer);

    let result = match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::HumanReadable => tracing::subscriber::set_global_default(
            builder.with_file(true).with_line_number(true).finish(),
        ),
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!(LogFormat::Json, "json".parse().unwrap());
        assert_eq!(LogFormat::Json, " JSON ".parse().unwrap());
        assert_eq!(LogFormat::HumanReadable, "human".parse().unwrap());
        assert_eq!(
            UnknownLogFormat("xml".to_string()),
            "xml".parse::<LogFormat>().unwrap_err()
        );
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for format in [LogFormat::HumanReadable, LogFormat::Json] {
            assert_eq!(format, format.to_string().parse().unwrap());
        }
    }

    #[test]
    fn second_install_reports_existing_subscriber() {
        configure_test_logger();
        assert!(!configure_global_logger_with_directives(
            "debug",
            LogFormat::Json,
            std::io::stderr,
        ));
    }
}
