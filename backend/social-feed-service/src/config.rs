/// Configuration management for the social feed service
///
/// Everything is read from environment variables. `from_lookup` takes the
/// lookup as a closure so the parsing rules can be tested without touching
/// the process environment.
use std::fmt;
use std::str::FromStr;

use crate::services::feature_flags::FeatureFlags;
use crate::services::feed::{FeedConfig, HasMorePolicy, DEFAULT_PAGE_SIZE};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Which store implementation backs the service
    pub storage: StorageBackend,
    /// Feed pagination
    pub feed: FeedConfig,
    pub features: FeatureFlags,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => f.write_str("postgres"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be postgres or memory, got '{}'",
                other
            )),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let app = AppConfig {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_env_or_default(&lookup, "APP_PORT", 8080)?,
            env: app_env,
        };

        let cors = {
            let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
                Some(value) => value,
                None if app.is_production() => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                None => "http://localhost:3000".to_string(),
            };

            if app.is_production() && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Postgres,
        };

        let database = DatabaseConfig {
            url: match lookup("DATABASE_URL") {
                Some(url) => url,
                None if storage == StorageBackend::Postgres && app.is_production() => {
                    return Err("DATABASE_URL must be set in production".to_string())
                }
                None => "postgresql://localhost/flappy".to_string(),
            },
            max_connections: parse_env_or_default(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: parse_env_or_default(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?,
        };
        if database.min_connections > database.max_connections {
            return Err(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                database.min_connections, database.max_connections
            ));
        }

        let page_size: i64 = parse_env_or_default(&lookup, "FEED_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size < 1 {
            return Err(format!("FEED_PAGE_SIZE must be positive, got {}", page_size));
        }
        let feed = FeedConfig {
            page_size,
            has_more_policy: parse_env_or_default(
                &lookup,
                "FEED_HAS_MORE_POLICY",
                HasMorePolicy::FullPage,
            )?,
        };

        let log_json = lookup("LOG_FORMAT")
            .map(|v| v.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Config {
            app,
            cors,
            database,
            storage,
            feed,
            features: FeatureFlags::from_lookup(&lookup),
            log_json,
        })
    }
}

/// Parse `key` if set; a present but unparseable value is an error.
fn parse_env_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("Invalid value for {}: '{}' ({})", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_in_development() {
        let config = load(&[]).unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.feed, FeedConfig::default());
        assert!(!config.log_json);
        assert_eq!(
            config.cors.origins().collect::<Vec<_>>(),
            vec!["http://localhost:3000"]
        );
    }

    #[test]
    fn production_requires_explicit_cors() {
        let err = load(&[("APP_ENV", "production"), ("DATABASE_URL", "postgres://db")])
            .unwrap_err();
        assert!(err.contains("CORS_ALLOWED_ORIGINS"));

        let err = load(&[
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://db"),
            ("CORS_ALLOWED_ORIGINS", "*"),
        ])
        .unwrap_err();
        assert!(err.contains("cannot be '*'"));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = load(&[("FEED_PAGE_SIZE", "ten")]).unwrap_err();
        assert!(err.contains("FEED_PAGE_SIZE"));

        assert!(load(&[("FEED_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("APP_PORT", "99999")]).is_err());
    }

    #[test]
    fn feed_and_storage_settings_parse() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("FEED_PAGE_SIZE", "25"),
            ("FEED_HAS_MORE_POLICY", "lookahead"),
            ("ENABLE_REACTIONS", "true"),
            ("LOG_FORMAT", "json"),
            ("CORS_ALLOWED_ORIGINS", "https://a.dev, https://b.dev"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.feed.page_size, 25);
        assert_eq!(config.feed.has_more_policy, HasMorePolicy::Lookahead);
        assert!(config.features.enable_reactions);
        assert!(config.log_json);
        assert_eq!(config.cors.origins().count(), 2);
    }
}
