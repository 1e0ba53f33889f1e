//! Configuration for the quote calculator

use crate::coercion::{parse_amount, parse_toggle};
use crate::error::Result;
use crate::types::{PricingMode, QuoteInput};
use crate::DEFAULT_BREAKDOWN_TITLE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Configuration for the quote calculator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Starting values for a new quote
    pub defaults: QuoteInput,

    /// Breakdown rendering
    pub formatter: FormatterConfig,

    /// Logging
    pub logging: LoggingConfig,
}

/// Breakdown rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// First line of the exported breakdown
    pub title: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { title: DEFAULT_BREAKDOWN_TITLE.to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

impl QuoteConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: QuoteConfig = toml::from_str(&content)?;
        info!("Loaded quote configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Wrote quote configuration to {}", path.display());
        Ok(())
    }

    /// Defaults overlaid with `QUOTE_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_with(|key| std::env::var(key).ok());
        config
    }

    /// Config file when a path is given, otherwise the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Overlay values from `lookup`; numbers use the parse-or-default rule
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = &mut self.defaults;

        if let Some(mode) = lookup("QUOTE_MODE") {
            match mode.parse::<PricingMode>() {
                Ok(mode) => d.mode = mode,
                Err(e) => warn!("Ignoring QUOTE_MODE: {}", e),
            }
        }

        if let Some(enabled) = lookup("QUOTE_TAX_SET_ASIDE") {
            match parse_toggle(&enabled) {
                Some(enabled) => d.tax_set_aside_enabled = enabled,
                None => warn!("Ignoring QUOTE_TAX_SET_ASIDE: {:?} is not on/off", enabled),
            }
        }

        let numeric: [(&str, &mut f64); 8] = [
            ("QUOTE_RATE", &mut d.rate),
            ("QUOTE_HOURS", &mut d.hours),
            ("QUOTE_FIXED_BID", &mut d.fixed_bid),
            ("QUOTE_PLATFORM_FEE_PCT", &mut d.platform_fee_pct),
            ("QUOTE_PROCESSOR_FEE_PCT", &mut d.processor_fee_pct),
            ("QUOTE_PROCESSOR_FLAT_FEE", &mut d.processor_flat_fee),
            ("QUOTE_TAX_SET_ASIDE_PCT", &mut d.tax_set_aside_pct),
            ("QUOTE_DEPOSIT_PCT", &mut d.deposit_pct),
        ];
        for (key, slot) in numeric {
            if let Some(raw) = lookup(key) {
                *slot = parse_amount(&raw);
            }
        }

        if let Some(title) = lookup("QUOTE_TITLE") {
            self.formatter.title = title;
        }

        if let Some(level) = lookup("QUOTE_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}
