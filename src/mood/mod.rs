pub mod client;
pub mod orchestrator;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Track;

pub use client::MoodServiceClient;
pub use orchestrator::{
    MoodShuffleOrchestrator, MoodSource, ShuffleOutcome, ShuffleRun, ShuffleState,
};

/// Track ids grouped by mood label, as the classifier returns them.
pub type RawMoodPartition = HashMap<String, Vec<String>>;

/// Tracks grouped by lowercase mood label.
pub type MoodPartition = HashMap<String, Vec<Track>>;

/// The moods a playlist can be shuffled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Angry,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Sad, Mood::Energetic, Mood::Calm, Mood::Angry];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Angry => "angry",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    /// Accepts the five labels plus the facial-expression names a mood
    /// predictor reports.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "happy" | "happiness" | "joy" => Ok(Mood::Happy),
            "sad" | "sadness" => Ok(Mood::Sad),
            "energetic" | "surprise" | "surprised" => Ok(Mood::Energetic),
            "calm" | "neutral" => Ok(Mood::Calm),
            "angry" | "anger" => Ok(Mood::Angry),
            _ => Err(AppError::InvalidMood(s.to_string())),
        }
    }
}

#[async_trait]
pub trait MoodClassifier: Send + Sync {
    /// Partitions `track_ids` by mood. `mood` is a hint for services that
    /// only compute the requested partition.
    async fn classify(&self, track_ids: &[String], mood: Option<Mood>) -> Result<RawMoodPartition>;
}

#[async_trait]
pub trait MoodPredictor: Send + Sync {
    /// Predicts a mood label from an encoded image.
    async fn predict(&self, image: &[u8]) -> Result<String>;
}

/// Maps a raw partition back onto fetched tracks. Labels are lowercased,
/// ids the playlist does not contain are dropped.
pub fn partition_tracks(raw: RawMoodPartition, tracks: &[Track]) -> MoodPartition {
    let by_id: HashMap<&str, &Track> = tracks
        .iter()
        .filter(|t| t.has_identity())
        .map(|t| (t.id.as_str(), t))
        .collect();

    let mut partition = MoodPartition::new();
    for (label, ids) in raw {
        let group = partition.entry(label.trim().to_lowercase()).or_default();
        group.extend(ids.iter().filter_map(|id| by_id.get(id.as_str()).map(|t| (*t).clone())));
    }
    partition
}
