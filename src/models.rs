use std::fmt;

use serde::{Deserialize, Serialize};

/// A track as one provider's catalog knows it. `id` and `uri` are empty for
/// entries the provider cannot address (e.g. local files).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub uri: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
}

impl Track {
    pub fn has_identity(&self) -> bool {
        !self.id.is_empty() && !self.uri.is_empty()
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub track_count: usize,
}

/// One occurrence of a track in a playlist, in playlist order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrackEntry {
    pub track: Track,
    pub added_index_hint: usize,
}

/// One occurrence to remove. `position` pins the removal to that occurrence
/// where the provider supports it; without it every occurrence of `uri` goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRemoval {
    pub uri: String,
    pub position: Option<usize>,
}

impl From<&PlaylistTrackEntry> for TrackRemoval {
    fn from(entry: &PlaylistTrackEntry) -> Self {
        Self {
            uri: entry.track.uri.clone(),
            position: Some(entry.added_index_hint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

/// A track described by metadata only, awaiting resolution to a native id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignTrackDescriptor {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl ForeignTrackDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = non_blank(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = non_blank(album.into());
        self
    }
}

impl From<&Track> for ForeignTrackDescriptor {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.primary_artist().and_then(|a| non_blank(a.to_string())),
            album: non_blank(track.album.clone()),
        }
    }
}

impl fmt::Display for ForeignTrackDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) => write!(f, "{} - {}", artist, self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
impl Track {
    pub fn mock(id: &str, title: &str, artist: &str) -> Self {
        Self {
            id: id.to_string(),
            uri: format!("spotify:track:{}", id),
            title: title.to_string(),
            artists: vec![artist.to_string()],
            album: "Mock Album".to_string(),
            duration_ms: 180000,
        }
    }
}
