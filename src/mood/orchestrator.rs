use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::AuthContext;
use crate::batcher::{MAX_CHUNK_SIZE, apply_in_chunks};
use crate::deadline::with_deadline;
use crate::error::{AppError, Result};
use crate::models::Track;
use crate::mood::{Mood, MoodClassifier, MoodPredictor, partition_tracks};
use crate::provider::PlaylistProvider;

/// Where the target mood comes from.
#[derive(Debug, Clone)]
pub enum MoodSource {
    Label(String),
    /// Encoded image handed to the mood predictor.
    Image(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleState {
    Idle,
    ResolvingMood,
    FetchingTracks,
    ClassifyingMood,
    ExtractingPartition,
    CreatingDestination,
    AddingTracks,
    Done,
    Failed,
}

impl fmt::Display for ShuffleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShuffleOutcome {
    pub mood: Mood,
    pub destination_playlist_id: String,
    pub track_count: usize,
    pub confirmation_token: Option<String>,
}

/// How a shuffle ended. `state` is `Done` or `Failed`; `stopped_at` is the
/// last stage entered, which for a failure is the stage that failed.
#[derive(Debug)]
pub struct ShuffleRun {
    pub state: ShuffleState,
    pub stopped_at: ShuffleState,
    pub result: Result<ShuffleOutcome>,
}

/// Builds a new playlist holding the tracks of a source playlist that the
/// classifier assigns to one mood.
pub struct MoodShuffleOrchestrator<'a, P: PlaylistProvider + ?Sized> {
    provider: &'a P,
    classifier: &'a dyn MoodClassifier,
    predictor: Option<&'a dyn MoodPredictor>,
    chunk_size: usize,
    deadline: Option<Duration>,
}

impl<'a, P: PlaylistProvider + ?Sized> MoodShuffleOrchestrator<'a, P> {
    pub fn new(provider: &'a P, classifier: &'a dyn MoodClassifier) -> Self {
        Self {
            provider,
            classifier,
            predictor: None,
            chunk_size: MAX_CHUNK_SIZE,
            deadline: None,
        }
    }

    pub fn with_predictor(mut self, predictor: &'a dyn MoodPredictor) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn shuffle(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        source: MoodSource,
        destination_name: Option<&str>,
    ) -> Result<ShuffleOutcome> {
        self.shuffle_with_state(auth, playlist_id, source, destination_name)
            .await
            .result
    }

    /// Like [`shuffle`](Self::shuffle), but also reports the terminal state
    /// and the stage the run stopped in.
    pub async fn shuffle_with_state(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        source: MoodSource,
        destination_name: Option<&str>,
    ) -> ShuffleRun {
        let mut state = ShuffleState::Idle;

        let result = with_deadline(
            self.deadline,
            self.run(auth, playlist_id, source, destination_name, &mut state),
        )
        .await;

        let stopped_at = state;
        if let Err(e) = &result {
            warn!("Mood shuffle of {} failed while {}: {}", playlist_id, state, e);
            advance(&mut state, ShuffleState::Failed);
        }

        ShuffleRun {
            state,
            stopped_at,
            result,
        }
    }

    async fn run(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        source: MoodSource,
        destination_name: Option<&str>,
        state: &mut ShuffleState,
    ) -> Result<ShuffleOutcome> {
        advance(state, ShuffleState::ResolvingMood);
        let mood = self.resolve_mood(source).await?;

        advance(state, ShuffleState::FetchingTracks);
        let entries = self.provider.list_playlist_tracks(auth, playlist_id).await?;
        let tracks: Vec<Track> = entries
            .into_iter()
            .map(|e| e.track)
            .filter(Track::has_identity)
            .collect();
        if tracks.is_empty() {
            return Err(AppError::EmptyPlaylist(playlist_id.to_string()));
        }

        advance(state, ShuffleState::ClassifyingMood);
        let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        let raw = self.classifier.classify(&track_ids, Some(mood)).await?;

        advance(state, ShuffleState::ExtractingPartition);
        let mut partition = partition_tracks(raw, &tracks);
        let selected = unique_by_id(partition.remove(mood.as_str()).unwrap_or_default());
        if selected.is_empty() {
            return Err(AppError::NoMoodMatch(mood.to_string()));
        }
        info!(
            "{} of {} tracks classified as {}",
            selected.len(),
            tracks.len(),
            mood
        );

        advance(state, ShuffleState::CreatingDestination);
        let name = destination_name
            .map(str::to_string)
            .unwrap_or_else(|| default_playlist_name(mood));
        let description = format!("{} tracks picked from playlist {}", mood, playlist_id);
        let destination = self
            .provider
            .create_playlist(auth, &name, &description)
            .await?;

        advance(state, ShuffleState::AddingTracks);
        let uris: Vec<String> = selected.iter().map(|t| t.uri.clone()).collect();
        let provider = self.provider;
        let destination_id = destination.id.as_str();
        let confirmation_token = apply_in_chunks(&uris, self.chunk_size, move |chunk| async move {
            provider.add_tracks(auth, destination_id, &chunk).await
        })
        .await
        .into_result(destination_id)?;

        advance(state, ShuffleState::Done);
        info!(
            "Created {} playlist '{}' with {} tracks",
            mood,
            name,
            uris.len()
        );

        Ok(ShuffleOutcome {
            mood,
            destination_playlist_id: destination.id,
            track_count: uris.len(),
            confirmation_token,
        })
    }

    async fn resolve_mood(&self, source: MoodSource) -> Result<Mood> {
        match source {
            MoodSource::Label(label) => label.parse(),
            MoodSource::Image(image) => {
                let predictor = self
                    .predictor
                    .ok_or_else(|| AppError::Config("no mood predictor configured".into()))?;
                predictor.predict(&image).await?.parse()
            }
        }
    }
}

fn advance(state: &mut ShuffleState, next: ShuffleState) {
    debug!("Mood shuffle: {} -> {}", state, next);
    *state = next;
}

fn default_playlist_name(mood: Mood) -> String {
    let label = mood.as_str();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{} Mix", first.to_uppercase(), chars.as_str()),
        None => "Mood Mix".to_string(),
    }
}

fn unique_by_id(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}
