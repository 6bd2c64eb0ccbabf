//! Logger configuration and presets.

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directive, e.g. `"info"` or `"debug,routeguard_route=trace"`.
    pub level: String,

    /// Output format.
    pub format: Format,

    /// Colored output.
    pub ansi: bool,

    /// Include the event target (module path).
    pub target: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line.
    Pretty,
    /// Single-line.
    Compact,
    /// Structured JSON, one object per line.
    Json,
}

impl Format {
    /// Parses a format name. Unknown names fall back to compact.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Compact,
            ansi: true,
            target: true,
        }
    }
}

impl Config {
    /// Configuration from `ROUTEGUARD_LOG` (or `RUST_LOG`) and
    /// `ROUTEGUARD_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] over an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("ROUTEGUARD_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = lookup("ROUTEGUARD_LOG_FORMAT") {
            config.format = Format::from_name(&format);
        }
        if config.format == Format::Json {
            config.ansi = false;
        }

        config
    }

    /// Development configuration (pretty, debug level).
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level, no colors).
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Json,
            ansi: false,
            target: true,
        }
    }
}
