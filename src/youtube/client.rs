use async_trait::async_trait;
use tracing::{info, warn};

use crate::auth::AuthContext;
use crate::config::Config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{ForeignTrackDescriptor, PlaylistSummary, PlaylistTrackEntry};
use crate::paginator::fetch_all;
use crate::provider::PlaylistSource;
use crate::youtube::models::{
    TokenPage, YoutubeApiPlaylist, YoutubeApiPlaylistItem, describe_video,
};

const PAGE_LIMIT: usize = 50;

/// YouTube Data API adapter. Read-only: playlists are a migration source.
pub struct YoutubeClient {
    api: ApiClient,
    base_url: String,
}

impl YoutubeClient {
    pub fn new(api: ApiClient, base_url: &str) -> Self {
        Self {
            api,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config.request_timeout)?;
        Ok(Self::new(api, &config.youtube_api_base))
    }

    async fn fetch_items(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<YoutubeApiPlaylistItem>> {
        let url = format!(
            "{}/playlistItems?part=snippet&maxResults={}&playlistId={}",
            self.base_url,
            PAGE_LIMIT,
            urlencoding::encode(playlist_id)
        );
        fetch_all::<TokenPage<YoutubeApiPlaylistItem>>(&self.api, &url, auth).await
    }
}

#[async_trait]
impl PlaylistSource for YoutubeClient {
    fn name(&self) -> &'static str {
        "YouTube"
    }

    async fn list_playlists(&self, auth: &AuthContext) -> Result<Vec<PlaylistSummary>> {
        let url = format!(
            "{}/playlists?part=snippet,contentDetails&mine=true&maxResults={}",
            self.base_url, PAGE_LIMIT
        );
        let playlists = fetch_all::<TokenPage<YoutubeApiPlaylist>>(&self.api, &url, auth).await?;

        info!("Found {} YouTube playlists", playlists.len());
        Ok(playlists.into_iter().map(PlaylistSummary::from).collect())
    }

    async fn list_playlist_tracks(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>> {
        let items = self.fetch_items(auth, playlist_id).await?;

        Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| PlaylistTrackEntry {
                added_index_hint: item.snippet.position.unwrap_or(index),
                track: item.snippet.into_track(),
            })
            .collect())
    }

    async fn list_track_descriptors(
        &self,
        auth: &AuthContext,
        playlist_id: &str,
    ) -> Result<Vec<ForeignTrackDescriptor>> {
        let items = self.fetch_items(auth, playlist_id).await?;
        let mut descriptors = Vec::with_capacity(items.len());

        for item in items {
            if item.snippet.is_unavailable() {
                warn!("Skipping unavailable video in playlist {}", playlist_id);
                continue;
            }
            let descriptor = describe_video(
                &item.snippet.title,
                item.snippet.video_owner_channel_title.as_deref(),
            );
            if descriptor.title.trim().is_empty() {
                warn!("Skipping untitled video in playlist {}", playlist_id);
                continue;
            }
            descriptors.push(descriptor);
        }

        info!(
            "Fetched {} tracks from YouTube playlist {}",
            descriptors.len(),
            playlist_id
        );
        Ok(descriptors)
    }
}
