use std::env;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-001";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_MATCH_COUNT: usize = 5;
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the query server, read once at startup.
///
/// The anon key authenticates the anonymous read paths (place names,
/// facility counts); the service role key authenticates the search RPCs,
/// document upserts and query-log writes.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
    pub google_api_key: String,
    pub embedding_model: String,
    pub generation_model: String,
    pub match_count: usize,
    pub match_threshold: f32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            supabase_url: required(&lookup, "SUPABASE_URL")?,
            supabase_anon_key: required(&lookup, "SUPABASE_ANON_KEY")?,
            supabase_service_key: required(&lookup, "SUPABASE_SERVICE_ROLE_KEY")?,
            google_api_key: required(&lookup, "GOOGLE_API_KEY")?,
            embedding_model: optional(&lookup, "EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            generation_model: optional(&lookup, "GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
            match_count: parsed(&lookup, "MATCH_COUNT", DEFAULT_MATCH_COUNT)?,
            match_threshold: parsed(&lookup, "MATCH_THRESHOLD", DEFAULT_MATCH_THRESHOLD)?,
        })
    }
}

/// Settings for the ingestion binary. Every store call it makes runs with
/// the service role key, so the anon key is not required.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub google_api_key: String,
    pub embedding_model: String,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            supabase_url: required(&lookup, "SUPABASE_URL")?,
            supabase_service_key: required(&lookup, "SUPABASE_SERVICE_ROLE_KEY")?,
            google_api_key: required(&lookup, "GOOGLE_API_KEY")?,
            embedding_model: optional(&lookup, "EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<T>()
                .map_err(|err| ConfigError::InvalidVar {
                    name,
                    value,
                    reason: err.to_string(),
                })
        }
        _ => Ok(default),
    }
}
