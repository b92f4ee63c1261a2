use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub recommender_base_url: String,
    pub recommender_timeout: Duration,
    /// Wizards idle longer than this are dropped.
    pub wizard_ttl: Duration,
    pub onboarding_state_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recommender_base_url: "http://127.0.0.1:8000".to_string(),
            recommender_timeout: Duration::from_secs(30),
            wizard_ttl: Duration::from_secs(30 * 60),
            onboarding_state_path: PathBuf::from(".voca/onboarding_seen"),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let recommender_base_url = lookup("RECOMMENDER_BASE_URL")
            .unwrap_or(defaults.recommender_base_url)
            .trim()
            .to_string();
        if recommender_base_url.is_empty() {
            anyhow::bail!("RECOMMENDER_BASE_URL must not be empty");
        }

        let recommender_timeout = secs_or(
            &lookup,
            "RECOMMENDER_TIMEOUT_SECS",
            defaults.recommender_timeout,
        )?;
        let wizard_ttl = secs_or(&lookup, "WIZARD_TTL_SECS", defaults.wizard_ttl)?;

        Ok(Config {
            recommender_base_url,
            recommender_timeout,
            wizard_ttl,
            onboarding_state_path: lookup("ONBOARDING_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.onboarding_state_path),
            port: lookup("PORT")
                .unwrap_or_else(|| defaults.port.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn secs_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a whole number of seconds")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.recommender_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.recommender_timeout, Duration::from_secs(30));
        assert_eq!(config.wizard_ttl, Duration::from_secs(1800));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("RECOMMENDER_BASE_URL", "http://careers.internal:9000/"),
            ("RECOMMENDER_TIMEOUT_SECS", "5"),
            ("WIZARD_TTL_SECS", "90"),
            ("ONBOARDING_STATE_PATH", "/tmp/seen"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.recommender_base_url, "http://careers.internal:9000/");
        assert_eq!(config.recommender_timeout, Duration::from_secs(5));
        assert_eq!(config.wizard_ttl, Duration::from_secs(90));
        assert_eq!(config.onboarding_state_path, PathBuf::from("/tmp/seen"));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("RECOMMENDER_TIMEOUT_SECS", "-1")]).is_err());
        assert!(load(&[("WIZARD_TTL_SECS", "soon")]).is_err());
        assert!(load(&[("RECOMMENDER_BASE_URL", "  ")]).is_err());
    }
}
