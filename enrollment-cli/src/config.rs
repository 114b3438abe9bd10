use anyhow::{Context, Result};
use enrollment_flow::chat::DEFAULT_MODEL;
use enrollment_flow::storage::DEFAULT_QUOTA_BYTES;
use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_STORE_PATH: &str = "submissions.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    pub quota_bytes: usize,
    pub openrouter_api_key: Option<String>,
    pub chat_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let quota_bytes = match non_empty("ENROLLMENT_STORE_QUOTA_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("ENROLLMENT_STORE_QUOTA_BYTES is not a number: {raw}"))?,
            None => DEFAULT_QUOTA_BYTES,
        };

        Ok(Self {
            store_path: non_empty("ENROLLMENT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            quota_bytes,
            openrouter_api_key: non_empty("OPENROUTER_API_KEY"),
            chat_model: non_empty("ENROLLMENT_CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Command-line flags win over the environment
    pub fn apply(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.store {
            self.store_path = path.clone();
        }
        if let Some(quota) = cli.quota_bytes {
            self.quota_bytes = quota;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert_eq!(config.openrouter_api_key, None);
        assert_eq!(config.chat_model, DEFAULT_MODEL);
    }

    #[test]
    fn reads_environment_and_flags_override() {
        let config = Config::from_lookup(lookup(&[
            ("ENROLLMENT_STORE_PATH", "/var/lib/aabb/s.json"),
            ("ENROLLMENT_STORE_QUOTA_BYTES", "1024"),
            ("OPENROUTER_API_KEY", "  "),
        ]))
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/var/lib/aabb/s.json"));
        assert_eq!(config.quota_bytes, 1024);
        assert_eq!(config.openrouter_api_key, None);

        let cli = Cli::try_parse_from(["enroll", "--quota-bytes", "2048", "wizard"]).unwrap();
        let config = config.apply(&cli);
        assert_eq!(config.quota_bytes, 2048);
        assert_eq!(config.store_path, PathBuf::from("/var/lib/aabb/s.json"));
    }

    #[test]
    fn rejects_malformed_quota() {
        let err = Config::from_lookup(lookup(&[("ENROLLMENT_STORE_QUOTA_BYTES", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("ENROLLMENT_STORE_QUOTA_BYTES"));
    }
}
