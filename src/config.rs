//! Interpreter configuration
//!
//! Every field has a default, so a partial JSON document (or none at all) is enough:
//!
//! ```
//! use crisp::Config;
//!
//! let config = Config::from_json_str(r#"{ "channel_capacity": 8 }"#).unwrap();
//! assert_eq!(config.channel_capacity, 8);
//! assert_eq!(config.max_eval_depth, Config::default().max_eval_depth);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of tokens buffered between the lexer and parser tasks
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Default nesting limit for evaluation
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 256;

/// Configuration for a Crisp session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity of the bounded lexer→parser channel (backpressure point)
    pub channel_capacity: usize,
    /// Maximum nesting of `eval` calls before an error node is returned
    pub max_eval_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

impl Config {
    /// Decodes a configuration from JSON and validates it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field is in range
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.max_eval_depth == 0 {
            return Err(Error::InvalidConfig(
                "max_eval_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = Config::from_json_str(r#"{ "channel_capacity": 0 }"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_json_rejected() {
        let result = Config::from_json_str(r#"{ "channel_capacity": "lots" }"#);
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }
}
