use crate::config::types::{FetchConfig, ParseMode, SelectorConfig, SiteConfig, StructuredConfig};
use crate::{ConfigError, ConfigResult};
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &SiteConfig) -> ConfigResult<()> {
    validate_site(config)?;
    validate_target_url(&config.target_url)?;
    validate_retry(config)?;
    validate_fetch_config(&config.fetch)?;

    if config.storage.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.path cannot be empty".to_string(),
        ));
    }

    match config.parse_mode {
        ParseMode::Generic => validate_selectors(config.selectors.as_ref())?,
        ParseMode::Structured => validate_structured(&config.structured)?,
    }

    Ok(())
}

fn validate_site(config: &SiteConfig) -> ConfigResult<()> {
    if config.site_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site_name cannot be empty".to_string(),
        ));
    }

    if config.crawler_identity.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_identity cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_target_url(target: &str) -> ConfigResult<()> {
    let url = Url::parse(target)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target_url '{}': {}", target, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "target_url '{}' must use http or https",
            target
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "target_url '{}' has no host",
            target
        )));
    }

    Ok(())
}

fn validate_retry(config: &SiteConfig) -> ConfigResult<()> {
    if config.retry < 1 {
        return Err(ConfigError::Validation(format!(
            "retry must be >= 1, got {}",
            config.retry
        )));
    }

    if !config.delay.is_finite() || config.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay
        )));
    }

    Ok(())
}

fn validate_fetch_config(fetch: &FetchConfig) -> ConfigResult<()> {
    if fetch.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch.timeout_secs must be >= 1".to_string(),
        ));
    }

    Selector::parse(&fetch.ready_selector).map_err(|e| {
        ConfigError::InvalidSelector(format!(
            "fetch.ready_selector '{}': {:?}",
            fetch.ready_selector, e
        ))
    })?;

    Url::parse(&fetch.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid fetch.webdriver_url: {}", e)))?;

    Ok(())
}

fn validate_selectors(selectors: Option<&SelectorConfig>) -> ConfigResult<()> {
    let selectors = selectors.ok_or_else(|| {
        ConfigError::Validation(
            "parse_mode 'generic' requires a [selectors] table with title and price".to_string(),
        )
    })?;

    for (name, value) in [("title", &selectors.title), ("price", &selectors.price)] {
        Selector::parse(value).map_err(|e| {
            ConfigError::InvalidSelector(format!("selectors.{} '{}': {:?}", name, value, e))
        })?;
    }

    Ok(())
}

fn validate_structured(structured: &StructuredConfig) -> ConfigResult<()> {
    if structured.title_font_size.trim().is_empty() || structured.body_font_size.trim().is_empty()
    {
        return Err(ConfigError::Validation(
            "structured font-size markers cannot be empty".to_string(),
        ));
    }

    if structured.locality.is_some() && structured.region_tokens.is_empty() {
        return Err(ConfigError::Validation(
            "structured.locality requires at least one region token".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> SiteConfig {
        toml::from_str(content).unwrap()
    }

    fn generic() -> SiteConfig {
        parse(
            r#"
site_name = "Test"
target_url = "https://example.com/"

[selectors]
title = "h2.name"
price = "span.price"
"#,
        )
    }

    #[test]
    fn test_valid_generic_config() {
        assert!(validate(&generic()).is_ok());
    }

    #[test]
    fn test_generic_requires_selectors() {
        let config = parse(
            r#"
site_name = "Test"
target_url = "https://example.com/"
"#,
        );
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_invalid_selector() {
        let mut config = generic();
        config.selectors.as_mut().unwrap().price = "span[".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidSelector(_)
        ));
    }

    #[test]
    fn test_zero_retry_rejected() {
        let mut config = generic();
        config.retry = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut config = generic();
        config.delay = -1.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_target_rejected() {
        let mut config = generic();
        config.target_url = "file:///etc/passwd".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_empty_storage_path_rejected() {
        let mut config = generic();
        config.storage.path = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_structured_locality_needs_region() {
        let config = parse(
            r#"
site_name = "Test"
target_url = "https://example.com/"
parse_mode = "structured"

[structured]
locality = "Scottsdale"
"#,
        );
        assert!(validate(&config).is_err());
    }
}
