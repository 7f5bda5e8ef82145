use crate::config::types::{AccessConfig, CheckerConfig, Config, UserAgentConfig};
use crate::url::AccessRoute;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_checker_config(&config.checker)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_access_config(&config.access)?;
    Ok(())
}

/// Validates checker configuration
fn validate_checker_config(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.batch_size < 1 || config.batch_size > 50 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 50, got {}",
            config.batch_size
        )));
    }

    if config.page_link_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "page_link_limit must be >= 1, got {}",
            config.page_link_limit
        )));
    }

    if config.link_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "link_timeout_ms must be >= 100ms, got {}ms",
            config.link_timeout_ms
        )));
    }

    if config.page_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "page_timeout_ms must be >= 100ms, got {}ms",
            config.page_timeout_ms
        )));
    }

    for ext in &config.extra_excluded_extensions {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates a file extension (without the leading dot)
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "excluded extension '{}' must be non-empty and alphanumeric (no leading dot)",
            ext
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, '-' and '_', got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the access route list
fn validate_access_config(config: &AccessConfig) -> Result<(), ConfigError> {
    if config.routes.is_empty() {
        return Err(ConfigError::Validation(
            "at least one access route is required".to_string(),
        ));
    }

    for route in &config.routes {
        AccessRoute::parse(route)?;
    }

    Ok(())
}
