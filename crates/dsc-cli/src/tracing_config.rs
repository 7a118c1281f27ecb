//! Log output for `dsc`.
//!
//! Builds, conflicts and substitutions emit `tracing` events. They are only
//! printed when a filter is configured:
//!
//! ```bash
//! DSC_LOG=debug dsc decls.json
//! DSC_LOG="dsc_model::builder=trace" DSC_LOG_FORMAT=tree dsc decls.json
//! DSC_LOG=debug DSC_LOG_FORMAT=json dsc decls.json --specialize box --arg Int
//! ```
//!
//! `DSC_LOG` wins over `RUST_LOG`. Events go to stderr; stdout carries only
//! the rendered descriptors.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "DSC_LOG";
pub const FORMAT_ENV: &str = "DSC_LOG_FORMAT";

/// Event layout selected by `DSC_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One `tracing-subscriber` line per event.
    #[default]
    Text,
    /// Indented spans via `tracing-tree`.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unrecognized values fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("tree") {
            Self::Tree
        } else if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Logging settings taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directives, e.g. `dsc_model=debug`.
    pub directives: String,
    pub format: LogFormat,
}

impl TracingConfig {
    /// `None` when neither `DSC_LOG` nor `RUST_LOG` is set.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let directives = var(LOG_ENV).or_else(|| var(EnvFilter::DEFAULT_ENV))?;
        let format = var(FORMAT_ENV)
            .map(|value| LogFormat::parse(&value))
            .unwrap_or_default();
        Some(Self { directives, format })
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }

    /// Install the global subscriber.
    pub fn install(&self) {
        let registry = Registry::default().with(self.filter());
        match self.format {
            LogFormat::Tree => registry
                .with(
                    tracing_tree::HierarchicalLayer::default()
                        .with_indent_amount(2)
                        .with_indent_lines(true)
                        .with_targets(true),
                )
                .init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init(),
            LogFormat::Text => registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .init(),
        }
    }
}

/// Install logging if the environment asks for it.
pub fn init_tracing() {
    if let Some(config) = TracingConfig::from_env() {
        config.install();
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
