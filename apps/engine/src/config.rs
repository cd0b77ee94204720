use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::ats::AtsConfig;
use crate::tools::executor::{ExecutorConfig, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECS};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub tool_workers: usize,
    pub tool_timeout_secs: u64,
    /// Directory the file tools may not leave.
    pub sandbox_root: PathBuf,
    pub ats_min_words: usize,
    pub ats_max_words: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = AtsConfig::default();

        let tool_workers = parse_or(&lookup, "TOOL_WORKERS", DEFAULT_MAX_WORKERS)?;
        if tool_workers == 0 {
            bail!("TOOL_WORKERS must be greater than zero");
        }
        let tool_timeout_secs = parse_or(&lookup, "TOOL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if tool_timeout_secs == 0 {
            bail!("TOOL_TIMEOUT_SECS must be greater than zero");
        }

        let ats_min_words = parse_or(&lookup, "ATS_MIN_WORDS", defaults.optimal_length_min)?;
        let ats_max_words = parse_or(&lookup, "ATS_MAX_WORDS", defaults.optimal_length_max)?;
        if ats_min_words > ats_max_words {
            bail!("ATS_MIN_WORDS ({ats_min_words}) must not exceed ATS_MAX_WORDS ({ats_max_words})");
        }

        let sandbox_root = match lookup("SANDBOX_ROOT") {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().context("Cannot determine current directory")?,
        };

        Ok(Config {
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            tool_workers,
            tool_timeout_secs,
            sandbox_root,
            ats_min_words,
            ats_max_words,
        })
    }

    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_workers: self.tool_workers,
            default_timeout_secs: self.tool_timeout_secs,
        }
    }

    pub fn ats(&self) -> AtsConfig {
        AtsConfig {
            optimal_length_min: self.ats_min_words,
            optimal_length_max: self.ats_max_words,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.tool_workers, 4);
        assert_eq!(config.tool_timeout_secs, 6);
        assert_eq!(config.ats_min_words, 400);
        assert_eq!(config.ats_max_words, 800);
        assert_eq!(config.sandbox_root, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("RUST_LOG", "debug"),
            ("TOOL_WORKERS", "8"),
            ("TOOL_TIMEOUT_SECS", " 2 "),
            ("SANDBOX_ROOT", "/srv/uploads"),
            ("ATS_MIN_WORDS", "300"),
            ("ATS_MAX_WORDS", "900"),
        ])
        .unwrap();
        assert_eq!(config.rust_log, "debug");
        assert_eq!(config.executor().max_workers, 8);
        assert_eq!(config.executor().default_timeout_secs, 2);
        assert_eq!(config.sandbox_root, PathBuf::from("/srv/uploads"));
        assert_eq!(config.ats().optimal_length_min, 300);
        assert_eq!(config.ats().optimal_length_max, 900);
    }

    #[test]
    fn test_malformed_number_rejected() {
        let err = config(&[("TOOL_WORKERS", "many")]).unwrap_err();
        assert!(err.to_string().contains("TOOL_WORKERS"));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(config(&[("TOOL_WORKERS", "0")]).is_err());
        assert!(config(&[("TOOL_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_inverted_length_bounds_rejected() {
        let err = config(&[("ATS_MIN_WORDS", "900"), ("ATS_MAX_WORDS", "800")]).unwrap_err();
        assert!(err.to_string().contains("ATS_MIN_WORDS"));
    }
}
