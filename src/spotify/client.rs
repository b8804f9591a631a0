use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::auth::AuthContext;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::http::ApiClient;
use crate::models::{
    ForeignTrackDescriptor, PlaylistSummary, PlaylistTrackEntry, Track, TrackRemoval, UserProfile,
};
use crate::paginator::{CursorPage, fetch_all};
use crate::provider::{PlaylistProvider, PlaylistSource};
use crate::spotify::models::{
    AddTracksRequest, CreatePlaylistRequest, RemoveTrackItem, RemoveTracksRequest,
    SnapshotResponse, SpotifyApiCreatedPlaylist, SpotifyApiPlaylist, SpotifyApiPlaylistItem,
    SpotifyApiUser, SpotifySearchResponse,
};

const PLAYLISTS_PAGE_LIMIT: usize = 50;
const TRACKS_PAGE_LIMIT: usize = 100;

/// Spotify Web API adapter. Holds no credentials; every call takes an
/// `AuthContext`.
pub struct SpotifyClient {
    api: ApiClient,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(api: ApiClient, base_url: &str) -> Self {
        Self {
            api,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config.request_timeout)?;
        Ok(Self::new(api, &config.spotify_api_base))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn playlist_tracks_url(&self, playlist_id: &str) -> String {
        self.endpoint(&format!(
            "playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        ))
    }

    /// Renders the Spotify field-filter query, e.g. `track:Song artist:Band`.
    pub fn search_query(query: &ForeignTrackDescriptor) -> String {
        let mut q = format!("track:{}", query.title.trim());
        if let Some(artist) = &query.artist {
            q.push_str(&format!(" artist:{}", artist));
        }
        if let Some(album) = &query.album {
            q.push_str(&format!(" album:{}", album));
        }
        q
    }

    fn search_url(&self, query: &ForeignTrackDescriptor) -> Result<String> {
        let mut url = Url::parse(&self.endpoint("search"))
            .map_err(|e| AppError::Config(format!("Invalid Spotify API base: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("q", &Self::search_query(query))
            .append_pair("type", "track")
            .append_pair("limit", "1");
        Ok(url.to_string())
    }
}

#[async_trait]
impl PlaylistSource for SpotifyClient {
    fn name(&self) -> &'static str {
        "Spotify"
    }

    async fn list_playlists(&self, auth: &AuthContext) -> Result<Vec<PlaylistSummary>> {
        let url = self.endpoint(&format!("me/playlists?limit={}", PLAYLISTS_PAGE_LIMIT));
        let playlists = fetch_all::<CursorPage<SpotifyApiPlaylist>>(&self.api, &url, auth).await?;

        info!("Found {} Spotify playlists", playlists.len());
        Ok(playlists.into_iter().map(PlaylistSummary::from).collect())
    }

    async fn list_playlist_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>> {
        let url = format!(
            "{}?limit={}",
            self.playlist_tracks_url(playlist_id),
            TRACKS_PAGE_LIMIT
        );
        let items = fetch_all::<CursorPage<SpotifyApiPlaylistItem>>(&self.api, &url, auth).await?;

        // Unavailable items keep their slot so positions line up with the playlist
        let entries: Vec<PlaylistTrackEntry> = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| PlaylistTrackEntry {
                track: item.track.map(Track::from).unwrap_or_default(),
                added_index_hint: position,
            })
            .collect();

        info!("Fetched {} tracks from playlist {}", entries.len(), playlist_id);
        Ok(entries)
    }
}

#[async_trait]
impl PlaylistProvider for SpotifyClient {
    async fn get_current_user(&self, auth: &AuthContext) -> Result<UserProfile> {
        let user: SpotifyApiUser = self.api.get_json(&self.endpoint("me"), auth).await?;
        Ok(UserProfile {
            id: user.id,
            display_name: user.display_name,
        })
    }

    async fn create_playlist(
        &self,
        auth: &AuthContext,
        name: &str,
        description: &str,
    ) -> Result<PlaylistSummary> {
        let user = self.get_current_user(auth).await?;
        let url = self.endpoint(&format!(
            "users/{}/playlists",
            urlencoding::encode(&user.id)
        ));

        let request = CreatePlaylistRequest {
            name,
            description,
            public: false,
            collaborative: false,
        };

        let created: SpotifyApiCreatedPlaylist = self.api.post_json(&url, auth, &request).await?;

        let id = created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::PlaylistCreation(format!("no id returned for '{}'", name)))?;

        info!("Created Spotify playlist: {} ({})", name, id);

        Ok(PlaylistSummary {
            id,
            name: if created.name.is_empty() {
                name.to_string()
            } else {
                created.name
            },
            owner_id: user.id,
            track_count: 0,
        })
    }

    async fn add_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        let url = self.playlist_tracks_url(playlist_id);
        let response: SnapshotResponse = self
            .api
            .post_json(&url, auth, &AddTracksRequest { uris })
            .await?;

        debug!("Added {} tracks to playlist {}", uris.len(), playlist_id);
        Ok(response.snapshot_id)
    }

    async fn remove_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
        removals: &[TrackRemoval],
    ) -> Result<String> {
        let url = self.playlist_tracks_url(playlist_id);
        let request = RemoveTracksRequest {
            tracks: removals
                .iter()
                .map(|r| RemoveTrackItem {
                    uri: r.uri.clone(),
                    positions: r.position.map(|p| vec![p]),
                })
                .collect(),
        };

        let response: SnapshotResponse = self.api.delete_json(&url, auth, &request).await?;

        debug!("Removed {} tracks from playlist {}", removals.len(), playlist_id);
        Ok(response.snapshot_id)
    }

    async fn search_track(
        &self,
        auth: &AuthContext,
        query: &ForeignTrackDescriptor,
    ) -> Result<Option<Track>> {
        let url = self.search_url(query)?;
        let response: SpotifySearchResponse = self.api.get_json(&url, auth).await?;

        Ok(response
            .tracks
            .and_then(|t| t.items.into_iter().next())
            .map(Track::from))
    }
}
