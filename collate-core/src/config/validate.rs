//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if !config.gateway.debounce_window_s.is_finite() || config.gateway.debounce_window_s <= 0.0 {
        errors.push("gateway.debounce_window_s must be a positive number".to_string());
    }
    if config.gateway.typing_interval_s == 0 {
        errors.push("gateway.typing_interval_s must be > 0".to_string());
    }

    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".to_string());
    }
    match config.logging.format.to_lowercase().as_str() {
        "text" | "json" => {}
        other => errors.push(format!(
            "logging.format must be 'text' or 'json', got '{}'",
            other
        )),
    }
    if config.logging.dir.trim().is_empty() {
        errors.push("logging.dir must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Config(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_window() {
        let mut config = Config::default();
        config.gateway.debounce_window_s = 0.0;
        assert!(validate_config(&config).is_err());

        config.gateway.debounce_window_s = -1.0;
        assert!(validate_config(&config).is_err());

        config.gateway.debounce_window_s = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "yaml".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_aggregates_all_errors() {
        let mut config = Config::default();
        config.gateway.debounce_window_s = 0.0;
        config.gateway.typing_interval_s = 0;
        config.logging.dir = String::new();

        let err = validate_config(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("debounce_window_s"));
        assert!(msg.contains("typing_interval_s"));
        assert!(msg.contains("logging.dir"));
    }
}
