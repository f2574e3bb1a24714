use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3147";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub timeout: Duration,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("TMDB_API_KEY")
            .ok_or_else(|| anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let base_url = get("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let language = get("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let timeout_secs = match get("TMDB_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TMDB_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let addr_raw = get("MOVIESCOPE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_raw
            .parse()
            .with_context(|| format!("MOVIESCOPE_ADDR is not a socket address: {}", addr_raw))?;

        info!("Using TMDB at {} (locale {})", base_url, language);
        Ok(Self {
            api_key,
            base_url,
            language,
            timeout: Duration::from_secs(timeout_secs),
            addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn requires_api_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[("TMDB_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.language, "en-US");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.addr.port(), 3147);
    }

    #[test]
    fn overrides_and_trims_base_url() {
        let cfg = Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", "k"),
            ("TMDB_BASE_URL", "http://127.0.0.1:9000/"),
            ("TMDB_LANGUAGE", "fr-FR"),
            ("TMDB_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.language, "fr-FR");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", "k"),
            ("TMDB_TIMEOUT_SECS", "soon")
        ]))
        .is_err());
    }
}
