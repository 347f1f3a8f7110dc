use std::str::FromStr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for CloudWatch
    #[default]
    Json,
    /// Human readable multi-line output for local runs
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(anyhow::anyhow!("unknown log format {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub log_format: LogFormat,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub use_path_style_buckets: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse().context("LOG_FORMAT must be json or pretty")?,
            None => LogFormat::default(),
        };

        let use_path_style_buckets = lookup("USE_PATH_STYLE_BUCKETS")
            .map(|value| value.to_lowercase() == "true")
            .unwrap_or(false);

        Ok(Self {
            log_format,
            use_path_style_buckets,
        })
    }

    /// Installs the global tracing subscriber. `RUST_LOG` overrides the default `info` filter.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match self.log_format {
            LogFormat::Json => tracing_subscriber::fmt()
                .with_ansi(false)
                .with_env_filter(filter)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .with_ansi(true)
                .with_env_filter(filter)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .init(),
        }
    }
}
