use std::time::Duration;

use thiserror::Error;

use crate::migrator::MigrationResult;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider network error: {0}")]
    ProviderNetwork(#[from] reqwest::Error),

    #[error("Provider API error ({status}): {message}")]
    ProviderApi { status: u16, message: String },

    #[error("Unrecognized mood: {0}")]
    InvalidMood(String),

    #[error("Playlist has no tracks: {0}")]
    EmptyPlaylist(String),

    #[error("No tracks classified as {0}")]
    NoMoodMatch(String),

    #[error("Playlist creation failed: {0}")]
    PlaylistCreation(String),

    #[error(
        "Batch failed at chunk {failed_at_chunk} of playlist {playlist_id} \
         ({succeeded_chunks} chunks / {committed_items} items already applied): {cause}"
    )]
    PartialBatchFailure {
        playlist_id: String,
        succeeded_chunks: usize,
        committed_items: usize,
        failed_at_chunk: usize,
        cause: Box<AppError>,
    },

    #[error("{}: {}", .result.summary(), .cause)]
    MigrationIncomplete {
        result: Box<MigrationResult>,
        cause: Box<AppError>,
    },

    #[error("Mood service error: {0}")]
    Classifier(String),

    #[error("Playlist not found: {0}")]
    NotFound(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// True when the provider rejected the token, i.e. the caller should
    /// re-authenticate rather than retry.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            AppError::ProviderApi { status, .. } => *status == 401 || *status == 403,
            AppError::PartialBatchFailure { cause, .. }
            | AppError::MigrationIncomplete { cause, .. } => cause.is_auth_expired(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
