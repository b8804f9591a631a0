use async_trait::async_trait;

use crate::auth::AuthContext;
use crate::error::Result;
use crate::models::{
    ForeignTrackDescriptor, PlaylistSummary, PlaylistTrackEntry, Track, TrackRemoval, UserProfile,
};

/// Read access to a provider's playlists. Every provider, primary or
/// secondary, normalizes its own JSON into these shapes.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Short provider name for logs and reports.
    fn name(&self) -> &'static str;

    async fn list_playlists(&self, auth: &AuthContext) -> Result<Vec<PlaylistSummary>>;

    async fn list_playlist_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>>;

    /// The playlist's tracks as descriptors for resolution in another
    /// catalog. Providers with messy metadata override this to clean it up.
    async fn list_track_descriptors(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<ForeignTrackDescriptor>> {
        let entries = self.list_playlist_tracks(auth, playlist_id).await?;
        Ok(entries
            .iter()
            .filter(|entry| !entry.track.title.trim().is_empty())
            .map(|entry| ForeignTrackDescriptor::from(&entry.track))
            .collect())
    }
}

/// The full set of operations of a catalog provider that playlists can be
/// written to.
#[async_trait]
pub trait PlaylistProvider: PlaylistSource {
    async fn get_current_user(&self, auth: &AuthContext) -> Result<UserProfile>;

    /// Creates a private playlist owned by the current user.
    async fn create_playlist(
        &self,
        auth: &AuthContext,
        name: &str,
        description: &str,
    ) -> Result<PlaylistSummary>;

    /// Appends at most one chunk of track URIs; returns the confirmation token.
    async fn add_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String>;

    /// Removes at most one chunk of occurrences; returns the confirmation token.
    async fn remove_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        removals: &[TrackRemoval],
    ) -> Result<String>;

    /// Top search hit for the fields present in `query`, if any.
    async fn search_track(
        &self,
        auth: &AuthContext,
        query: &ForeignTrackDescriptor,
    ) -> Result<Option<Track>>;
}
