use strsim::jaro_winkler;

use crate::models::{ForeignTrackDescriptor, Track};

const CONFIDENCE_THRESHOLD: f64 = 0.85;

const TITLE_WEIGHT: f64 = 0.6;
const ARTIST_WEIGHT: f64 = 0.3;
const ALBUM_WEIGHT: f64 = 0.1;

/// Similarity between a descriptor and the track a search returned.
/// Weighted 60% title, 30% artist, 10% album, re-normalized over the fields
/// the descriptor actually has.
pub fn calculate_similarity(descriptor: &ForeignTrackDescriptor, track: &Track) -> f64 {
    let mut score = TITLE_WEIGHT * text_similarity(&descriptor.title, &track.title);
    let mut weight = TITLE_WEIGHT;

    if let Some(artist) = &descriptor.artist {
        // Best of the track's credited artists, so features don't count against it
        let artist_score = track
            .artists
            .iter()
            .map(|a| text_similarity(artist, a))
            .fold(0.0, f64::max);
        score += ARTIST_WEIGHT * artist_score;
        weight += ARTIST_WEIGHT;
    }

    if let Some(album) = &descriptor.album {
        score += ALBUM_WEIGHT * text_similarity(album, &track.album);
        weight += ALBUM_WEIGHT;
    }

    score / weight
}

/// Check if a similarity score is high enough to trust without review
pub fn is_confident_match(score: f64) -> bool {
    score >= CONFIDENCE_THRESHOLD
}

fn text_similarity(a: &str, b: &str) -> f64 {
    jaro_winkler(&a.trim().to_lowercase(), &b.trim().to_lowercase())
}
