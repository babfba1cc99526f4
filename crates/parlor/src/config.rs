//! Process configuration read from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::ParlorError;

const DEFAULT_PORT: &str = "3000";

/// Settings for the `parlor-server` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// A connection that sends nothing for this long is closed. `None`
    /// keeps silent connections open.
    pub idle_timeout: Option<Duration>,
    /// Optional JSON content pack replacing the built-in data sets.
    pub content: Option<PathBuf>,
    /// Fixed RNG seed, for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: format!("0.0.0.0:{DEFAULT_PORT}"),
            idle_timeout: None,
            content: None,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment.
    ///
    /// - `PARLOR_BIND`: full bind address; wins over `PORT`
    /// - `PORT`: port on `0.0.0.0` (default 3000)
    /// - `PARLOR_IDLE_TIMEOUT_SECS`: idle timeout (default: none)
    /// - `PARLOR_CONTENT`: path to a content pack
    /// - `PARLOR_SEED`: RNG seed
    pub fn from_env() -> Result<Self, ParlorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ParlorError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = match get("PARLOR_BIND") {
            Some(addr) => addr,
            None => {
                let port = get("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
                let port: u16 = parse("PORT", &port)?;
                format!("0.0.0.0:{port}")
            }
        };

        let idle_secs = get("PARLOR_IDLE_TIMEOUT_SECS")
            .map(|raw| parse::<u64>("PARLOR_IDLE_TIMEOUT_SECS", &raw))
            .transpose()?;
        if idle_secs == Some(0) {
            return Err(ParlorError::Config(
                "PARLOR_IDLE_TIMEOUT_SECS must be positive".into(),
            ));
        }

        let seed = get("PARLOR_SEED")
            .map(|raw| parse::<u64>("PARLOR_SEED", &raw))
            .transpose()?;

        Ok(Self {
            bind,
            idle_timeout: idle_secs.map(Duration::from_secs),
            content: get("PARLOR_CONTENT").map(PathBuf::from),
            seed,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ParlorError> {
    raw.trim()
        .parse()
        .map_err(|_| ParlorError::Config(format!("{key} must be a number, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind, "0.0.0.0:3000");
        assert_eq!(config.idle_timeout, None);
    }

    #[test]
    fn test_port_sets_bind() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_parlor_bind_wins_over_port() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("PARLOR_BIND", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = ServerConfig::from_lookup(lookup(&[("PARLOR_BIND", "  ")])).unwrap();
        assert_eq!(config.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_content_seed_and_timeout() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PARLOR_CONTENT", "/etc/parlor/content.json"),
            ("PARLOR_SEED", "42"),
            ("PARLOR_IDLE_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.content, Some(PathBuf::from("/etc/parlor/content.json")));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ParlorError::Config(msg)) if msg.contains("PORT")));
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[("PARLOR_SEED", "-1")]));
        assert!(matches!(result, Err(ParlorError::Config(_))));
    }

    #[test]
    fn test_zero_idle_timeout_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[("PARLOR_IDLE_TIMEOUT_SECS", "0")]));
        assert!(matches!(result, Err(ParlorError::Config(_))));
    }
}
