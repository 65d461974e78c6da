// config.rs
use std::env;
use std::str::FromStr;

use crate::errors::{AppError, Result};

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// How many lines of each type are created when a match starts.
/// Lines are numbered per type: doubles 1..=doubles, singles 1..=singles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineupConfig {
    pub doubles: u8,
    pub singles: u8,
}

impl Default for LineupConfig {
    fn default() -> Self {
        LineupConfig {
            doubles: 3,
            singles: 6,
        }
    }
}

impl LineupConfig {
    pub fn total(&self) -> usize {
        usize::from(self.doubles) + usize::from(self.singles)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub database_name: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub lineup: LineupConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: None,
            database_name: "match_tracker".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            lineup: LineupConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = AppConfig::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using the development secret");
            defaults.jwt_secret.clone()
        });

        let lineup = LineupConfig {
            doubles: parse_or(var("DOUBLES_LINES"), "DOUBLES_LINES", defaults.lineup.doubles)?,
            singles: parse_or(var("SINGLES_LINES"), "SINGLES_LINES", defaults.lineup.singles)?,
        };
        if lineup.total() == 0 {
            return Err(AppError::configuration(
                "DOUBLES_LINES and SINGLES_LINES cannot both be zero",
            ));
        }

        Ok(AppConfig {
            database_url: var("DATABASE_URL"),
            database_name: var("DATABASE_NAME").unwrap_or(defaults.database_name),
            jwt_secret,
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or(var("PORT"), "PORT", defaults.port)?,
            cors_origins: var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            lineup,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| AppError::configuration(format!("{key} must be a number, got '{value}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.port, 8000);
        assert_eq!(config.lineup, LineupConfig { doubles: 3, singles: 6 });
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = config_from(&[
            ("DATABASE_URL", "mongodb://localhost:27017"),
            ("PORT", " 9000 "),
            ("CORS_ORIGINS", "http://localhost:3000, https://scores.example.com,"),
            ("SINGLES_LINES", "4"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://scores.example.com"]
        );
        assert_eq!(config.lineup.singles, 4);
        assert_eq!(config.lineup.total(), 7);
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn invalid_numbers_are_configuration_errors() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(AppError::ConfigurationError(_))
        ));
        assert!(matches!(
            config_from(&[("DOUBLES_LINES", "0"), ("SINGLES_LINES", "0")]),
            Err(AppError::ConfigurationError(_))
        ));
    }
}
