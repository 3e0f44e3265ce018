use anyhow::Context;
use chrono::NaiveDate;
use clap::ValueEnum;

/// How validation results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How log lines are written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// CLI configuration loaded from environment variables.
///
/// Command-line flags take precedence over everything here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Fixed validation date; `None` means the local date.
    pub today: Option<NaiveDate>,
    pub output: OutputFormat,
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default        |
    /// |--------------------|----------------|
    /// | `DATAENTRY_TODAY`  | local date     |
    /// | `DATAENTRY_OUTPUT` | `text`         |
    /// | `LOG_FORMAT`       | `text`         |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let today = non_empty("DATAENTRY_TODAY")
            .map(|v| {
                NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                    .with_context(|| format!("DATAENTRY_TODAY must be YYYY-MM-DD, got {v:?}"))
            })
            .transpose()?;

        let output = match non_empty("DATAENTRY_OUTPUT") {
            Some(v) => parse_enum::<OutputFormat>("DATAENTRY_OUTPUT", &v)?,
            None => OutputFormat::default(),
        };

        let log_format = match non_empty("LOG_FORMAT") {
            Some(v) => parse_enum::<LogFormat>("LOG_FORMAT", &v)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            today,
            output,
            log_format,
        })
    }
}

fn parse_enum<T: ValueEnum>(key: &str, value: &str) -> anyhow::Result<T> {
    T::from_str(value.trim(), true)
        .map_err(|err| anyhow::anyhow!("{key} has an unsupported value: {err}"))
}
