//! Subscriber assembly.

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Builds the fmt layer for one of the text formats.
macro_rules! create_fmt_layer {
    ($format:ident, $config:expr) => {
        tracing_subscriber::fmt::layer()
            .$format()
            .with_writer(std::io::stderr)
            .with_ansi($config.ansi)
            .with_target($config.target)
    };
}

/// Logger builder.
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

impl LoggerBuilder {
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parses the filter without installing anything.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Filter`] if the level directive is malformed.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the filter string cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<()> {
        let filter = self.filter()?;
        let registry = Registry::default().with(filter);

        let installed = match self.config.format {
            Format::Pretty => registry
                .with(create_fmt_layer!(pretty, self.config))
                .try_init(),
            Format::Compact => registry
                .with(create_fmt_layer!(compact, self.config))
                .try_init(),
            Format::Json => registry
                .with(
                    create_fmt_layer!(json, self.config)
                        .with_current_span(true)
                        .flatten_event(true),
                )
                .try_init(),
        };

        installed.map_err(|_| LogError::AlreadyInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_is_reported_before_install() {
        let builder = LoggerBuilder::from_config(Config {
            level: "info,routeguard=verbose".to_owned(),
            ..Config::default()
        });
        let err = builder.filter().unwrap_err();
        assert_eq!(err.code(), "LOG_FILTER");
        assert!(err.to_string().starts_with("invalid filter: info,routeguard=verbose"));
    }

    #[test]
    fn layered_filter_parses() {
        let builder = LoggerBuilder::from_config(Config {
            level: "warn,routeguard_route=debug".to_owned(),
            ..Config::default()
        });
        assert!(builder.filter().is_ok());
    }
}
