use bigtable2_error::{DbError, Result};
use logutil::LogFormat;

/// Filter directives for the extension's logger. Logging is left untouched
/// when unset.
pub const LOG_ENV: &str = "BIGTABLE2_LOG";

/// Output format for the extension's logger, `human` or `json`.
pub const LOG_FORMAT_ENV: &str = "BIGTABLE2_LOG_FORMAT";

/// Settings read when the extension is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionConfig {
    pub log_directives: Option<String>,
    pub log_format: LogFormat,
}

impl ExtensionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config using `lookup` to resolve variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_directives = lookup(LOG_ENV).filter(|s| !s.trim().is_empty());

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(format) => format.parse::<LogFormat>().map_err(|e| {
                DbError::with_source("Invalid log format", Box::new(e))
                    .with_field("variable", LOG_FORMAT_ENV)
                    .with_field("value", format)
            })?,
            None => LogFormat::default(),
        };

        Ok(ExtensionConfig {
            log_directives,
            log_format,
        })
    }

    /// Install a global logger writing to stderr if directives were provided.
    ///
    /// Returns true if a logger was installed by this call.
    pub fn configure_logging(&self) -> bool {
        match &self.log_directives {
            Some(directives) => logutil::configure_global_logger_with_directives(
                directives,
                self.log_format,
                std::io::stderr,
            ),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ExtensionConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(ExtensionConfig::default(), config);
        assert!(!config.configure_logging());
    }

    #[test]
    fn reads_directives_and_format() {
        let config = ExtensionConfig::from_lookup(lookup_from(&[
            (LOG_ENV, "bigtable2=debug"),
            (LOG_FORMAT_ENV, "json"),
        ]))
        .unwrap();

        assert_eq!(Some("bigtable2=debug".to_string()), config.log_directives);
        assert_eq!(LogFormat::Json, config.log_format);
    }

    #[test]
    fn blank_directives_are_ignored() {
        let config = ExtensionConfig::from_lookup(lookup_from(&[(LOG_ENV, "  ")])).unwrap();
        assert_eq!(None, config.log_directives);
    }

    #[test]
    fn invalid_format_names_variable() {
        let err =
            ExtensionConfig::from_lookup(lookup_from(&[(LOG_FORMAT_ENV, "xml")])).unwrap_err();

        assert_eq!("Invalid log format", err.get_msg());
        assert_eq!(Some(LOG_FORMAT_ENV.to_string()), err.get_field("variable"));
        assert_eq!(Some("xml".to_string()), err.get_field("value"));
    }
}
