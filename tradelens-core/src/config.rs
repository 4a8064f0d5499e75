//! Runtime configuration.
//!
//! Loaded from TOML; every field has a default so partial files work.
//!
//! ```toml
//! translator_enabled = true
//! translator_target_lang = "th"
//! upstream_timeout_s = 5.0
//! news_limit = 10
//!
//! [cache_ttls]
//! market_data_s = 300
//! exchange_ticker_s = 15
//! ```

use crate::analysis::news::DEFAULT_NEWS_LIMIT;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const FINNHUB_KEY_ENV: &str = "FINNHUB_API_KEY";

/// Memoization lifetimes in seconds, one per collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheTtls {
    pub market_data_s: u64,
    pub stock_info_s: u64,
    pub exchange_ticker_s: u64,
    pub news_s: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            market_data_s: 300,
            stock_info_s: 3600,
            exchange_ticker_s: 15,
            news_s: 3600,
        }
    }
}

impl CacheTtls {
    pub fn market_data(&self) -> Duration {
        Duration::from_secs(self.market_data_s)
    }

    pub fn stock_info(&self) -> Duration {
        Duration::from_secs(self.stock_info_s)
    }

    pub fn exchange_ticker(&self) -> Duration {
        Duration::from_secs(self.exchange_ticker_s)
    }

    pub fn news(&self) -> Duration {
        Duration::from_secs(self.news_s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translator_enabled: bool,
    pub translator_target_lang: String,
    pub upstream_timeout_s: f64,
    pub cache_ttls: CacheTtls,
    /// Credential for the primary news provider. Without it only the
    /// fallback provider is consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finnhub_api_key: Option<String>,
    pub news_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator_enabled: false,
            translator_target_lang: "th".into(),
            upstream_timeout_s: 5.0,
            cache_ttls: CacheTtls::default(),
            finnhub_api_key: None,
            news_limit: DEFAULT_NEWS_LIMIT,
        }
    }
}

impl Config {
    /// Load from a TOML file, then apply environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?.with_env())
    }

    /// Parse a TOML string. No environment overrides are applied.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Fill the Finnhub key from `FINNHUB_API_KEY` when the file left it empty.
    pub fn with_env(self) -> Self {
        self.with_finnhub_key(std::env::var(FINNHUB_KEY_ENV).ok())
    }

    fn with_finnhub_key(mut self, env_key: Option<String>) -> Self {
        let missing = self
            .finnhub_api_key
            .as_deref()
            .map_or(true, |k| k.trim().is_empty());
        if missing {
            self.finnhub_api_key = env_key.filter(|k| !k.trim().is_empty());
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream_timeout()?;
        if self.translator_target_lang.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "translator_target_lang must not be empty".into(),
            ));
        }
        if self.news_limit == 0 || self.news_limit > DEFAULT_NEWS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "news_limit must be between 1 and {DEFAULT_NEWS_LIMIT}, got {}",
                self.news_limit
            )));
        }
        Ok(())
    }

    /// Per-call collaborator timeout.
    pub fn upstream_timeout(&self) -> Result<Duration, ConfigError> {
        let secs = self.upstream_timeout_s;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "upstream_timeout_s must be a positive number, got {secs}"
            )));
        }
        Ok(Duration::from_secs_f64(secs))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.upstream_timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(config.cache_ttls.exchange_ticker(), Duration::from_secs(15));
        assert_eq!(config.news_limit, 10);
    }

    #[test]
    fn partial_ttls_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            translator_enabled = true
            [cache_ttls]
            market_data_s = 60
            "#,
        )
        .unwrap();
        assert!(config.translator_enabled);
        assert_eq!(config.cache_ttls.market_data_s, 60);
        assert_eq!(config.cache_ttls.news_s, 3600);
    }

    #[test]
    fn rejects_non_positive_timeout() {
        let err = Config::from_toml("upstream_timeout_s = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(Config::from_toml("upstream_timeout_s = -1.5").is_err());
    }

    #[test]
    fn news_limit_must_stay_within_cap() {
        assert!(Config::from_toml("news_limit = 10").is_ok());
        assert!(matches!(
            Config::from_toml("news_limit = 50"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(Config::from_toml("news_limit = 0").is_err());
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            Config::from_toml("translator_enabled = \"maybe\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_key_fills_only_when_missing() {
        let config = Config::default().with_finnhub_key(Some("env-key".into()));
        assert_eq!(config.finnhub_api_key.as_deref(), Some("env-key"));

        let config = Config {
            finnhub_api_key: Some("file-key".into()),
            ..Config::default()
        }
        .with_finnhub_key(Some("env-key".into()));
        assert_eq!(config.finnhub_api_key.as_deref(), Some("file-key"));

        let config = Config::default().with_finnhub_key(Some("  ".into()));
        assert_eq!(config.finnhub_api_key, None);
    }

    #[test]
    fn from_file_and_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "translator_target_lang = \"ja\"").unwrap();
        writeln!(file, "news_limit = 5").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.translator_target_lang, "ja");
        assert_eq!(config.news_limit, 5);

        let round = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(round.translator_target_lang, "ja");
    }

    #[test]
    fn missing_file_is_read_error() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/tradelens.toml")),
            Err(ConfigError::Read(_))
        ));
    }
}
