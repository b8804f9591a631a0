use std::collections::HashMap;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::http::ApiClient;
use crate::mood::{Mood, MoodClassifier, MoodPredictor, RawMoodPartition};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyRequest<'a> {
    track_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    mood: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyResponse {
    mood_partitions: HashMap<String, Vec<PartitionEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartitionEntry {
    track_id: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    mood: String,
}

/// HTTP client for the external mood classifier and the optional
/// mood-from-image predictor.
pub struct MoodServiceClient {
    api: ApiClient,
    classify_url: String,
    predict_url: Option<String>,
}

impl MoodServiceClient {
    pub fn new(api: ApiClient, classify_url: &str, predict_url: Option<&str>) -> Self {
        Self {
            api,
            classify_url: classify_url.to_string(),
            predict_url: predict_url.map(str::to_string),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (classify_url, predict_url) = config.mood_endpoints()?;
        let api = ApiClient::new(config.request_timeout)?;
        Ok(Self::new(api, &classify_url, predict_url.as_deref()))
    }
}

fn service_error(operation: &str, err: AppError) -> AppError {
    match err {
        AppError::Json(e) => AppError::Classifier(format!("malformed {} response: {}", operation, e)),
        AppError::ProviderApi { status, message } => {
            AppError::Classifier(format!("{} failed ({}): {}", operation, status, message))
        }
        other => other,
    }
}

#[async_trait]
impl MoodClassifier for MoodServiceClient {
    async fn classify(&self, track_ids: &[String], mood: Option<Mood>) -> Result<RawMoodPartition> {
        let request = ClassifyRequest {
            track_ids,
            mood: mood.map(|m| m.as_str()),
        };

        let response: ClassifyResponse = self
            .api
            .post_unauthenticated(&self.classify_url, &request)
            .await
            .map_err(|e| service_error("classification", e))?;

        debug!(
            "Classifier returned {} partitions for {} tracks",
            response.mood_partitions.len(),
            track_ids.len()
        );

        Ok(response
            .mood_partitions
            .into_iter()
            .map(|(label, entries)| (label, entries.into_iter().map(|e| e.track_id).collect()))
            .collect())
    }
}

#[async_trait]
impl MoodPredictor for MoodServiceClient {
    async fn predict(&self, image: &[u8]) -> Result<String> {
        let url = self
            .predict_url
            .as_deref()
            .ok_or_else(|| AppError::Config("MOOD_PREDICT_URL not set".into()))?;

        let request = PredictRequest {
            image: general_purpose::STANDARD.encode(image),
        };

        let response: PredictResponse = self
            .api
            .post_unauthenticated(url, &request)
            .await
            .map_err(|e| service_error("prediction", e))?;

        info!("Predicted mood from image: {}", response.mood);
        Ok(response.mood)
    }
}
