//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Marketplace policy configuration.
    pub marketplace: MarketplaceConfig,
}

/// Marketplace policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// Credits granted when a user first completes onboarding (minor units).
    #[serde(default = "default_welcome_bonus")]
    pub welcome_bonus_credits: Decimal,
    /// Hours before class start within which a consumer cancellation
    /// is no longer refunded in full.
    #[serde(default = "default_cancellation_window")]
    pub cancellation_window_hours: u32,
    /// Points awarded per completed booking, as a percentage of the
    /// final price in minor units (0 disables cashback).
    #[serde(default = "default_cashback_percent")]
    pub cashback_percent: u32,
}

fn default_welcome_bonus() -> Decimal {
    Decimal::new(500, 0)
}

fn default_cancellation_window() -> u32 {
    24
}

fn default_cashback_percent() -> u32 {
    0
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            welcome_bonus_credits: default_welcome_bonus(),
            cancellation_window_hours: default_cancellation_window(),
            cashback_percent: default_cashback_percent(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SLOTBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
