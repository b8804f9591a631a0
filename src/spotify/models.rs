use serde::{Deserialize, Serialize};

use crate::models::{PlaylistSummary, Track};

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiOwner {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiTracksRef {
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiPlaylist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub owner: SpotifyApiOwner,
    pub tracks: Option<SpotifyApiTracksRef>,
}

impl From<SpotifyApiPlaylist> for PlaylistSummary {
    fn from(playlist: SpotifyApiPlaylist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            owner_id: playlist.owner.id,
            track_count: playlist.tracks.map(|t| t.total).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiPlaylistItem {
    pub track: Option<SpotifyApiTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiAlbum {
    #[serde(default)]
    pub name: String,
}

/// Tracks and episodes share this shape; episodes simply lack artists and album.
#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiTrack {
    pub id: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyApiArtist>,
    pub album: Option<SpotifyApiAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub is_local: bool,
}

impl From<SpotifyApiTrack> for Track {
    fn from(track: SpotifyApiTrack) -> Self {
        // Local files carry a uri but no catalog id; treat them as unaddressable
        let (id, uri) = if track.is_local {
            (String::new(), String::new())
        } else {
            (track.id.unwrap_or_default(), track.uri.unwrap_or_default())
        };

        Self {
            id,
            uri,
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.map(|a| a.name).unwrap_or_default(),
            duration_ms: track.duration_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifySearchResponse {
    pub tracks: Option<SpotifySearchTracks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifySearchTracks {
    #[serde(default)]
    pub items: Vec<SpotifyApiTrack>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpotifyApiCreatedPlaylist {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddTracksRequest<'a> {
    pub uris: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveTracksRequest {
    pub tracks: Vec<RemoveTrackItem>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveTrackItem {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<usize>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotResponse {
    pub snapshot_id: String,
}
