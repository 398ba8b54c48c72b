use anyhow::Context;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };
        Ok(Self {
            server_port: required("SERVER_PORT")?,
            database_url: required("DATABASE_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_both_values() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "4000"),
            ("DATABASE_URL", "sqlite://data/products.db"),
        ]))
        .unwrap();
        assert_eq!(cfg.server_port, "4000");
        assert_eq!(cfg.database_url, "sqlite://data/products.db");
    }

    #[test]
    fn missing_port_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "memory://")])).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }

    #[test]
    fn blank_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "4000"),
            ("DATABASE_URL", "   "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
