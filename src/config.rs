use std::time::Duration;

use crate::auth::AuthContext;
use crate::batcher::MAX_CHUNK_SIZE;
use crate::error::{AppError, Result};
use crate::resolver::SearchFields;

const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_api_base: String,
    pub youtube_api_base: String,
    pub spotify_access_token: String,
    pub youtube_access_token: String,
    pub mood_classify_url: Option<String>,
    pub mood_predict_url: Option<String>,
    pub chunk_size: usize,
    pub request_timeout: Duration,
    pub operation_deadline: Option<Duration>,
    pub search_fields: SearchFields,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let chunk_size = match get("BATCH_CHUNK_SIZE") {
            Some(raw) => {
                let size: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Config(format!("BATCH_CHUNK_SIZE is not a number: {}", raw)))?;
                if size == 0 || size > MAX_CHUNK_SIZE {
                    return Err(AppError::Config(format!(
                        "BATCH_CHUNK_SIZE must be between 1 and {}",
                        MAX_CHUNK_SIZE
                    )));
                }
                size
            }
            None => MAX_CHUNK_SIZE,
        };

        let request_timeout = Duration::from_secs(
            parse_secs(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        let operation_deadline =
            parse_secs(get("OPERATION_DEADLINE_SECS"), "OPERATION_DEADLINE_SECS")?
                .map(Duration::from_secs);

        let search_fields = match get("SEARCH_FIELDS") {
            Some(raw) => raw.parse()?,
            None => SearchFields::default(),
        };

        Ok(Self {
            spotify_api_base: get("SPOTIFY_API_BASE")
                .unwrap_or_else(|| DEFAULT_SPOTIFY_API_BASE.to_string()),
            youtube_api_base: get("YOUTUBE_API_BASE")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE.to_string()),
            spotify_access_token: get("SPOTIFY_ACCESS_TOKEN").unwrap_or_default(),
            youtube_access_token: get("YOUTUBE_ACCESS_TOKEN").unwrap_or_default(),
            mood_classify_url: get("MOOD_CLASSIFY_URL"),
            mood_predict_url: get("MOOD_PREDICT_URL"),
            chunk_size,
            request_timeout,
            operation_deadline,
            search_fields,
        })
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.spotify_access_token.is_empty() {
            missing.push("SPOTIFY_ACCESS_TOKEN".to_string());
        }

        missing
    }

    pub fn spotify_auth(&self) -> AuthContext {
        AuthContext::new(self.spotify_access_token.clone())
    }

    pub fn youtube_auth(&self) -> Result<AuthContext> {
        if self.youtube_access_token.is_empty() {
            return Err(AppError::Config("YOUTUBE_ACCESS_TOKEN not set".into()));
        }
        Ok(AuthContext::new(self.youtube_access_token.clone()))
    }

    /// Returns the classifier and predictor endpoints, failing if the
    /// classifier is not configured. The predictor is optional.
    pub fn mood_endpoints(&self) -> Result<(String, Option<String>)> {
        let classify = self
            .mood_classify_url
            .clone()
            .ok_or_else(|| AppError::Config("MOOD_CLASSIFY_URL not set".into()))?;
        Ok((classify, self.mood_predict_url.clone()))
    }
}

fn parse_secs(raw: Option<String>, key: &str) -> Result<Option<u64>> {
    raw.map(|v| {
        v.trim()
            .parse::<u64>()
            .map_err(|_| AppError::Config(format!("{} is not a number of seconds: {}", key, v)))
    })
    .transpose()
}
