//! In-memory providers and mood services for driving the orchestrators
//! without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use moodlist::mood::{Mood, MoodClassifier, MoodPredictor, RawMoodPartition};
use moodlist::{
    AppError, AuthContext, ForeignTrackDescriptor, PlaylistProvider, PlaylistSource,
    PlaylistSummary, PlaylistTrackEntry, Result, Track, TrackRemoval, UserProfile,
};

pub fn auth() -> AuthContext {
    AuthContext::new("test-token")
}

pub fn track(id: &str, title: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        album: "Album".to_string(),
        duration_ms: 200_000,
    }
}

pub fn entries(tracks: Vec<Track>) -> Vec<PlaylistTrackEntry> {
    tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| PlaylistTrackEntry {
            track,
            added_index_hint: i,
        })
        .collect()
}

pub fn api_error(status: u16) -> AppError {
    AppError::ProviderApi {
        status,
        message: "fake failure".to_string(),
    }
}

#[derive(Clone)]
pub enum FakeSearch {
    Hit(Track),
    Miss,
    Fail(u16),
    /// Never answers within any test deadline.
    Stall,
}

#[derive(Default)]
pub struct FakeProvider {
    playlists: HashMap<String, Vec<PlaylistTrackEntry>>,
    search: HashMap<String, FakeSearch>,
    fail_add_on_call: Option<usize>,
    fail_create: bool,
    pub searches: Mutex<Vec<ForeignTrackDescriptor>>,
    pub created: Mutex<Vec<String>>,
    pub add_calls: Mutex<Vec<Vec<String>>>,
    pub remove_calls: Mutex<Vec<Vec<TrackRemoval>>>,
    pub fetches: Mutex<usize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playlist(mut self, id: &str, tracks: Vec<Track>) -> Self {
        self.playlists.insert(id.to_string(), entries(tracks));
        self
    }

    pub fn with_entries(mut self, id: &str, entries: Vec<PlaylistTrackEntry>) -> Self {
        self.playlists.insert(id.to_string(), entries);
        self
    }

    /// Search outcome keyed by the query title.
    pub fn with_search(mut self, title: &str, outcome: FakeSearch) -> Self {
        self.search.insert(title.to_string(), outcome);
        self
    }

    /// Makes the nth (0-indexed) add_tracks call fail.
    pub fn failing_add_on_call(mut self, call: usize) -> Self {
        self.fail_add_on_call = Some(call);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn add_calls(&self) -> Vec<Vec<String>> {
        self.add_calls.lock().unwrap().clone()
    }

    pub fn remove_calls(&self) -> Vec<Vec<TrackRemoval>> {
        self.remove_calls.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<ForeignTrackDescriptor> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaylistSource for FakeProvider {
    fn name(&self) -> &'static str {
        "Fake"
    }

    async fn list_playlists(&self, _auth: &AuthContext) -> Result<Vec<PlaylistSummary>> {
        let mut playlists: Vec<PlaylistSummary> = self
            .playlists
            .iter()
            .map(|(id, entries)| PlaylistSummary {
                id: id.clone(),
                name: format!("Playlist {}", id),
                owner_id: "me".to_string(),
                track_count: entries.len(),
            })
            .collect();
        playlists.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(playlists)
    }

    async fn list_playlist_tracks(
        &self,
        _auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>> {
        *self.fetches.lock().unwrap() += 1;
        self.playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| api_error(404))
    }
}

#[async_trait]
impl PlaylistProvider for FakeProvider {
    async fn get_current_user(&self, _auth: &AuthContext) -> Result<UserProfile> {
        Ok(UserProfile {
            id: "me".to_string(),
            display_name: None,
        })
    }

    async fn create_playlist(
        &self,
        _auth: &AuthContext,
        name: &str,
        _description: &str,
    ) -> Result<PlaylistSummary> {
        if self.fail_create {
            return Err(AppError::PlaylistCreation(name.to_string()));
        }

        let mut created = self.created.lock().unwrap();
        created.push(name.to_string());
        Ok(PlaylistSummary {
            id: format!("created-{}", created.len()),
            name: name.to_string(),
            owner_id: "me".to_string(),
            track_count: 0,
        })
    }

    async fn add_tracks(
        &self,
        _auth: &AuthContext,
        _playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        let mut calls = self.add_calls.lock().unwrap();
        let index = calls.len();
        calls.push(uris.to_vec());

        if self.fail_add_on_call == Some(index) {
            return Err(api_error(500));
        }
        Ok(format!("snapshot-{}", index))
    }

    async fn remove_tracks(
        &self,
        _auth: &AuthContext,
        _playlist_id: &str,
        removals: &[TrackRemoval],
    ) -> Result<String> {
        let mut calls = self.remove_calls.lock().unwrap();
        calls.push(removals.to_vec());
        Ok(format!("snapshot-rm-{}", calls.len() - 1))
    }

    async fn search_track(
        &self,
        _auth: &AuthContext,
        query: &ForeignTrackDescriptor,
    ) -> Result<Option<Track>> {
        self.searches.lock().unwrap().push(query.clone());

        match self.search.get(&query.title).cloned() {
            Some(FakeSearch::Hit(track)) => Ok(Some(track)),
            Some(FakeSearch::Fail(status)) => Err(api_error(status)),
            Some(FakeSearch::Stall) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(None)
            }
            Some(FakeSearch::Miss) | None => Ok(None),
        }
    }
}

/// Source-only provider that hands out fixed descriptors.
pub struct FakeSource {
    pub descriptors: Vec<ForeignTrackDescriptor>,
}

#[async_trait]
impl PlaylistSource for FakeSource {
    fn name(&self) -> &'static str {
        "FakeSource"
    }

    async fn list_playlists(&self, _auth: &AuthContext) -> Result<Vec<PlaylistSummary>> {
        Ok(vec![PlaylistSummary {
            id: "src".to_string(),
            name: "Source".to_string(),
            owner_id: "someone".to_string(),
            track_count: self.descriptors.len(),
        }])
    }

    async fn list_playlist_tracks(
        &self,
        _auth: &AuthContext,
        _playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>> {
        Err(api_error(405))
    }

    async fn list_track_descriptors(
        &self,
        _auth: &AuthContext,
        _playlist_id: &str,
    ) -> Result<Vec<ForeignTrackDescriptor>> {
        Ok(self.descriptors.clone())
    }
}

pub struct FakeClassifier {
    response: Result<RawMoodPartition>,
    pub calls: Mutex<Vec<(Vec<String>, Option<Mood>)>>,
}

impl FakeClassifier {
    pub fn returning(partitions: Vec<(&str, Vec<&str>)>) -> Self {
        let raw = partitions
            .into_iter()
            .map(|(label, ids)| (label.to_string(), ids.into_iter().map(str::to_string).collect()))
            .collect();
        Self {
            response: Ok(raw),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Err(AppError::Classifier("model offline".to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MoodClassifier for FakeClassifier {
    async fn classify(&self, track_ids: &[String], mood: Option<Mood>) -> Result<RawMoodPartition> {
        self.calls.lock().unwrap().push((track_ids.to_vec(), mood));
        match &self.response {
            Ok(raw) => Ok(raw.clone()),
            Err(e) => Err(AppError::Classifier(e.to_string())),
        }
    }
}

pub struct FakePredictor(pub &'static str);

#[async_trait]
impl MoodPredictor for FakePredictor {
    async fn predict(&self, _image: &[u8]) -> Result<String> {
        Ok(self.0.to_string())
    }
}
