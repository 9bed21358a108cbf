//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const OUTPUT_FORMATS: &[&str] = &["json", "jsonl"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.processing.extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.extensions must not be empty".into(),
            ));
        }
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be one of {:?}, got {:?}",
                OUTPUT_FORMATS, self.output.format
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_parallel_workers() {
        let mut config = Config::default();
        config.processing.parallel_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut config = Config::default();
        config.processing.extensions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extensions"));
    }

    #[test]
    fn test_validate_rejects_unknown_output_format() {
        let mut config = Config::default();
        config.output.format = "yaml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.format"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
