use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn read_env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ConfigError::new(format!("{name} could not be read: {error}"))),
    }
}

pub fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, ConfigError> {
    let parsed = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::new(format!("{name} must be a positive integer in seconds")))?;
    if parsed == 0 {
        return Err(ConfigError::new(format!(
            "{name} must be greater than 0 seconds"
        )));
    }
    Ok(Duration::from_secs(parsed))
}

pub fn parse_max_tokens(name: &str, value: &str) -> Result<u32, ConfigError> {
    let parsed = value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::new(format!("{name} must be a positive integer")))?;
    if parsed == 0 {
        return Err(ConfigError::new(format!("{name} must be greater than 0")));
    }
    Ok(parsed)
}

pub fn parse_temperature(name: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::new(format!("{name} must be a number")))?;
    if !(0.0..=2.0).contains(&parsed) {
        return Err(ConfigError::new(format!(
            "{name} must be in 0.0..=2.0 (got {parsed})"
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ConfigError, parse_max_tokens, parse_temperature, parse_timeout_seconds};

    #[test]
    fn parse_timeout_seconds_accepts_positive_integer_values() {
        let timeout = parse_timeout_seconds("TEST_TIMEOUT", " 8 ")
            .expect("positive integer timeout should parse");
        assert_eq!(timeout, Duration::from_secs(8));
    }

    #[test]
    fn parse_timeout_seconds_rejects_invalid_values() {
        let zero = parse_timeout_seconds("TEST_TIMEOUT", "0")
            .expect_err("zero timeout should fail validation");
        assert_eq!(
            zero,
            ConfigError::new("TEST_TIMEOUT must be greater than 0 seconds")
        );

        let invalid = parse_timeout_seconds("TEST_TIMEOUT", "abc")
            .expect_err("non-integer timeout should fail validation");
        assert_eq!(
            invalid,
            ConfigError::new("TEST_TIMEOUT must be a positive integer in seconds")
        );
    }

    #[test]
    fn parse_max_tokens_rejects_zero_and_garbage() {
        assert_eq!(parse_max_tokens("MAX", "512"), Ok(512));
        assert!(parse_max_tokens("MAX", "0").is_err());
        assert!(parse_max_tokens("MAX", "-3").is_err());
    }

    #[test]
    fn parse_temperature_enforces_range() {
        assert_eq!(parse_temperature("TEMP", "0.3"), Ok(0.3));
        assert_eq!(
            parse_temperature("TEMP", "2.5"),
            Err(ConfigError::new("TEMP must be in 0.0..=2.0 (got 2.5)"))
        );
        assert!(parse_temperature("TEMP", "warm").is_err());
    }
}
