use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::AuthContext;
use crate::batcher::apply_in_chunks;
use crate::error::Result;
use crate::models::{PlaylistTrackEntry, TrackRemoval};
use crate::provider::PlaylistProvider;

/// Returns the occurrences to remove so every track id appears once. The
/// first occurrence of an id is always kept; entries without an id or uri
/// are ignored.
pub fn find_duplicates(entries: &[PlaylistTrackEntry]) -> Vec<PlaylistTrackEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates = Vec::new();

    for entry in entries {
        if !entry.track.has_identity() {
            warn!(
                "Skipping malformed entry at position {}: {}",
                entry.added_index_hint, entry.track.title
            );
            continue;
        }

        if !seen.insert(entry.track.id.as_str()) {
            duplicates.push(entry.clone());
        }
    }

    duplicates
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    pub playlist_id: String,
    pub scanned: usize,
    pub removed: Vec<PlaylistTrackEntry>,
    pub confirmation_token: Option<String>,
    pub dry_run: bool,
}

/// Fetches a playlist, finds its duplicates and removes them unless
/// `dry_run`. Removals go highest position first so positions of the
/// remaining occurrences stay valid between chunks.
pub async fn remove_duplicates<P>(
    provider: &P,
    auth: &AuthContext,
    playlist_id: &str,
    chunk_size: usize,
    dry_run: bool,
) -> Result<DedupReport>
where
    P: PlaylistProvider + ?Sized,
{
    let entries = provider.list_playlist_tracks(auth, playlist_id).await?;
    let removed = find_duplicates(&entries);

    info!(
        "Found {} duplicate entries in {} scanned (dry_run={})",
        removed.len(),
        entries.len(),
        dry_run
    );

    let mut report = DedupReport {
        playlist_id: playlist_id.to_string(),
        scanned: entries.len(),
        removed,
        confirmation_token: None,
        dry_run,
    };

    if dry_run || report.removed.is_empty() {
        return Ok(report);
    }

    let mut removals: Vec<TrackRemoval> = report.removed.iter().map(TrackRemoval::from).collect();
    removals.sort_by(|a, b| b.position.cmp(&a.position));

    report.confirmation_token = apply_in_chunks(&removals, chunk_size, move |chunk| async move {
        provider.remove_tracks(auth, playlist_id, &chunk).await
    })
    .await
    .into_result(playlist_id)?;

    Ok(report)
}
