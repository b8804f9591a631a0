use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::models::{ForeignTrackDescriptor, PlaylistSummary, Track};
use crate::paginator::Page;

const TOPIC_SUFFIX: &str = " - Topic";
const UNAVAILABLE_TITLES: [&str; 2] = ["Deleted video", "Private video"];
const NOISE_KEYWORDS: [&str; 8] = [
    "official", "video", "audio", "lyric", "visualizer", "visualiser", "mv", "hd",
];

/// YouTube pages carry a `nextPageToken` instead of a URL; the next URL is
/// the current one with `pageToken` replaced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T: DeserializeOwned> Page for TokenPage<T> {
    type Item = T;

    fn into_parts(self, current_url: &str) -> (Vec<T>, Option<String>) {
        let next = self
            .next_page_token
            .filter(|token| !token.is_empty())
            .and_then(|token| with_page_token(current_url, &token));
        (self.items, next)
    }
}

fn with_page_token(current_url: &str, token: &str) -> Option<String> {
    let mut url = Url::parse(current_url).ok()?;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "pageToken")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("pageToken", token);
    Some(url.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YoutubeApiPlaylist {
    pub id: String,
    pub snippet: YoutubePlaylistSnippet,
    pub content_details: Option<YoutubePlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YoutubePlaylistSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YoutubePlaylistContentDetails {
    #[serde(default)]
    pub item_count: usize,
}

impl From<YoutubeApiPlaylist> for PlaylistSummary {
    fn from(playlist: YoutubeApiPlaylist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.snippet.title,
            owner_id: playlist.snippet.channel_id,
            track_count: playlist
                .content_details
                .map(|d| d.item_count)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct YoutubeApiPlaylistItem {
    pub snippet: YoutubeItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YoutubeItemSnippet {
    #[serde(default)]
    pub title: String,
    pub video_owner_channel_title: Option<String>,
    pub position: Option<usize>,
    pub resource_id: Option<YoutubeResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct YoutubeResourceId {
    pub video_id: Option<String>,
}

impl YoutubeItemSnippet {
    pub fn is_unavailable(&self) -> bool {
        UNAVAILABLE_TITLES.contains(&self.title.as_str())
    }

    pub fn into_track(self) -> Track {
        let video_id = if self.is_unavailable() {
            String::new()
        } else {
            self.resource_id
                .and_then(|r| r.video_id)
                .unwrap_or_default()
        };
        let uri = if video_id.is_empty() {
            String::new()
        } else {
            format!("https://music.youtube.com/watch?v={}", video_id)
        };

        Track {
            id: video_id,
            uri,
            artists: Self::artist_from_channel(self.video_owner_channel_title.as_deref())
                .into_iter()
                .collect(),
            title: self.title,
            album: String::new(),
            duration_ms: 0,
        }
    }

    fn artist_from_channel(channel: Option<&str>) -> Option<String> {
        channel
            .and_then(|c| c.strip_suffix(TOPIC_SUFFIX))
            .map(|c| c.trim().to_string())
    }
}

/// Turns a video title and uploader channel into a search descriptor.
/// `Artist - Title` titles are split, noise suffixes such as
/// `(Official Video)` are dropped, and auto-generated `Artist - Topic`
/// channels supply the artist when the title does not.
pub fn describe_video(title: &str, channel: Option<&str>) -> ForeignTrackDescriptor {
    let cleaned = strip_noise(title);

    if let Some((artist, song)) = cleaned.split_once(" - ") {
        if !artist.trim().is_empty() && !song.trim().is_empty() {
            return ForeignTrackDescriptor::new(song.trim()).with_artist(artist.trim());
        }
    }

    let descriptor = ForeignTrackDescriptor::new(cleaned.trim());
    match YoutubeItemSnippet::artist_from_channel(channel) {
        Some(artist) => descriptor.with_artist(artist),
        None => descriptor,
    }
}

fn strip_noise(title: &str) -> String {
    let mut cleaned = title.trim().to_string();

    loop {
        let Some(open) = cleaned.rfind(['(', '[']) else {
            break;
        };
        if !(cleaned.ends_with(')') || cleaned.ends_with(']')) {
            break;
        }

        let inner = cleaned[open + 1..cleaned.len() - 1].to_lowercase();
        let is_noise = inner
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| NOISE_KEYWORDS.iter().any(|k| word.starts_with(k)));
        if !is_noise {
            break;
        }

        cleaned.truncate(open);
        cleaned = cleaned.trim_end().to_string();
    }

    cleaned
}
