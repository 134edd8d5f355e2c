// src/config.rs

use std::{env, fmt, net::SocketAddr, path::PathBuf, str::FromStr};

use dotenvy::dotenv;

/// Passing threshold used when an exam definition does not set one.
pub const DEFAULT_PASSING_SCORE: u8 = 70;

/// Leaderboard rows returned when the caller does not ask for a limit.
pub const LEADERBOARD_DEFAULT_LIMIT: usize = 10;

pub const LEADERBOARD_MAX_LIMIT: usize = 100;

/// How long a finished attempt stays fetchable before it is evicted.
pub const DEFAULT_ATTEMPT_RETENTION_SECONDS: u64 = 3600;

/// How a manual submit treats unanswered questions.
///
/// Time-up submission ignores the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPolicy {
    /// Submit whatever has been answered.
    Immediate,
    /// Ask the taker to confirm when questions are unanswered.
    #[default]
    ConfirmUnanswered,
    /// Refuse to submit until every question has an answer.
    RequireAllAnswered,
}

impl FromStr for SubmitPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "confirm" => Ok(Self::ConfirmUnanswered),
            "require_all" => Ok(Self::RequireAllAnswered),
            other => Err(ConfigError::Invalid("SUBMIT_POLICY", other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid(key, value) => write!(f, "{key} has an invalid value: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub exam_catalog: Option<PathBuf>,
    pub submit_policy: SubmitPolicy,
    pub attempt_retention_seconds: u64,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = parse_or("JWT_EXPIRATION", 86_400)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let exam_catalog = env::var("EXAM_CATALOG").ok().map(PathBuf::from);

        let submit_policy = parse_or("SUBMIT_POLICY", SubmitPolicy::default())?;

        let attempt_retention_seconds =
            parse_or("ATTEMPT_RETENTION_SECONDS", DEFAULT_ATTEMPT_RETENTION_SECONDS)?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        Ok(Self {
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            exam_catalog,
            submit_policy,
            attempt_retention_seconds,
            allowed_origins,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(key, raw.clone())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_policy_parsing() {
        assert_eq!("immediate".parse::<SubmitPolicy>().unwrap(), SubmitPolicy::Immediate);
        assert_eq!(" Confirm ".parse::<SubmitPolicy>().unwrap(), SubmitPolicy::ConfirmUnanswered);
        assert_eq!(
            "require_all".parse::<SubmitPolicy>().unwrap(),
            SubmitPolicy::RequireAllAnswered
        );
        assert!("sometimes".parse::<SubmitPolicy>().is_err());
    }

    #[test]
    fn test_config_error_message() {
        assert_eq!(ConfigError::Missing("JWT_SECRET").to_string(), "JWT_SECRET must be set");
    }
}
