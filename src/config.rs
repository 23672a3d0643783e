use std::env;
use thiserror::Error;

/// Origins allowed when CORS_ALLOWED_ORIGINS is not set.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://tripforbeauty.wixsite.com",
    "https://*.wixsite.com",
    "http://localhost:3000",
];

const DEFAULT_DB_NAME: &str = "game_backend";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Reads the process environment. `.env` must already be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                if let Some(host) = lookup("DB_HOST") {
                    tracing::debug!(
                        "DB_HOST={} DB_USER={} ignored by the sqlite backend",
                        host,
                        lookup("DB_USER").unwrap_or_default()
                    );
                }
                let name = lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
                format!("sqlite://{}.db", name)
            }
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => 8000,
        };

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            database_url,
            host,
            port,
            allowed_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect()
}

/// Matches a request origin against one allowed entry. A `*.` label
/// stands for exactly one subdomain label.
pub fn origin_matches(pattern: &str, origin: &str) -> bool {
    let Some((scheme, rest)) = pattern.split_once("://*.") else {
        return pattern == origin;
    };
    let Some(host) = origin.strip_prefix(scheme).and_then(|o| o.strip_prefix("://")) else {
        return false;
    };
    match host.strip_suffix(rest) {
        Some(label) => {
            let label = match label.strip_suffix('.') {
                Some(label) => label,
                None => return false,
            };
            !label.is_empty() && !label.contains('.')
        }
        None => false,
    }
}
