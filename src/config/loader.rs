//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        ticker = %config.market.ticker,
        side = %config.market.trade_side,
        gamma = config.model.gamma,
        horizon_secs = config.model.horizon_secs,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Positive model coefficients and horizon
/// - Probability-valued fields inside (0, 1)
/// - A non-empty market ticker
/// - A tick interval that fits inside the horizon
fn validate_config(config: &AppConfig) -> Result<()> {
    // Market validation
    anyhow::ensure!(
        !config.market.ticker.is_empty(),
        "market.ticker must not be empty"
    );

    // Model validation
    anyhow::ensure!(
        config.model.gamma > 0.0,
        "model.gamma must be positive, got {}",
        config.model.gamma
    );
    anyhow::ensure!(
        config.model.k > 0.0,
        "model.k must be positive, got {}",
        config.model.k
    );
    anyhow::ensure!(
        config.model.sigma > 0.0,
        "model.sigma must be positive, got {}",
        config.model.sigma
    );
    anyhow::ensure!(
        config.model.horizon_secs > 0.0,
        "model.horizon_secs must be positive, got {}",
        config.model.horizon_secs
    );
    anyhow::ensure!(
        config.model.max_position > 0,
        "model.max_position must be positive, got {}",
        config.model.max_position
    );
    anyhow::ensure!(
        config.model.min_spread > 0.0 && config.model.min_spread < 1.0,
        "model.min_spread must be in (0, 1), got {}",
        config.model.min_spread
    );
    anyhow::ensure!(
        config.model.position_limit_buffer > 0.0
            && config.model.position_limit_buffer <= 1.0,
        "model.position_limit_buffer must be in (0, 1], got {}",
        config.model.position_limit_buffer
    );
    anyhow::ensure!(
        config.model.inventory_skew_factor >= 0.0,
        "model.inventory_skew_factor must be non-negative, got {}",
        config.model.inventory_skew_factor
    );
    anyhow::ensure!(
        config.model.order_expiration_secs > 0,
        "model.order_expiration_secs must be positive, got {}",
        config.model.order_expiration_secs
    );
    anyhow::ensure!(
        config.model.tick_interval_secs > 0.0
            && config.model.tick_interval_secs < config.model.horizon_secs,
        "model.tick_interval_secs must be positive and below the horizon, got {}",
        config.model.tick_interval_secs
    );

    // API validation
    anyhow::ensure!(
        config.api.base_url.starts_with("http"),
        "api.base_url must be an http(s) URL, got {}",
        config.api.base_url
    );
    anyhow::ensure!(
        config.api.timeout_ms > 0,
        "api.timeout_ms must be positive"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_toml() -> &'static str {
        r#"
[bot]
name = "kalshi-avellaneda"

[market]
ticker = "KXHIGHNY-25AUG29-B85.5"
trade_side = "yes"

[model]
gamma = 0.1
k = 1.5
sigma = 0.02
horizon_secs = 3600.0
max_position = 100
order_expiration_secs = 120
tick_interval_secs = 5.0

[api]

[metrics]
"#
    }

    #[test]
    fn test_valid_config_parses_with_defaults() {
        let config: AppConfig = toml::from_str(valid_toml()).unwrap();
        validate_config(&config).unwrap();

        assert_eq!(config.bot.log_level, "info");
        assert!(!config.bot.dry_run);
        assert!((config.model.min_spread - 0.01).abs() < 1e-12);
        assert!((config.model.position_limit_buffer - 0.1).abs() < 1e-12);
        assert_eq!(config.api.base_url, "https://api.elections.kalshi.com");
    }

    #[test]
    fn test_zero_gamma_rejected() {
        let toml_str = valid_toml().replace("gamma = 0.1", "gamma = 0.0");
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("gamma"));
    }

    #[test]
    fn test_tick_interval_must_fit_horizon() {
        let toml_str =
            valid_toml().replace("tick_interval_secs = 5.0", "tick_interval_secs = 7200.0");
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        assert!(validate_config(&config).is_err());
    }
}
