use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::auth::AuthContext;
use crate::batcher::{MAX_CHUNK_SIZE, apply_in_chunks};
use crate::deadline::{Deadline, within};
use crate::error::{AppError, Result};
use crate::matcher::is_confident_match;
use crate::migrator::report::{LowConfidenceMatch, MigrationResult};
use crate::models::{ForeignTrackDescriptor, PlaylistSummary};
use crate::provider::{PlaylistProvider, PlaylistSource};
use crate::resolver::{MatchResult, SearchFields, TrackResolver};

/// Copies a playlist from any source provider into the destination catalog.
pub struct MigrationOrchestrator<'a, P: PlaylistProvider + ?Sized> {
    destination: &'a P,
    search_fields: SearchFields,
    chunk_size: usize,
    deadline: Option<Duration>,
    show_progress: bool,
}

impl<'a, P: PlaylistProvider + ?Sized> MigrationOrchestrator<'a, P> {
    pub fn new(destination: &'a P) -> Self {
        Self {
            destination,
            search_fields: SearchFields::default(),
            chunk_size: MAX_CHUNK_SIZE,
            deadline: None,
            show_progress: false,
        }
    }

    pub fn with_search_fields(mut self, search_fields: SearchFields) -> Self {
        self.search_fields = search_fields;
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

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Migrates one playlist. The destination is created before any track is
    /// resolved, so even a migration with no matches leaves a named playlist.
    /// Once it exists, a failing batch add or an elapsed deadline yields
    /// `MigrationIncomplete` carrying the counts gathered so far.
    pub async fn migrate<S: PlaylistSource + ?Sized>(
        &self,
        source: &S,
        source_auth: &AuthContext,
        destination_auth: &AuthContext,
        source_playlist_id: &str,
        destination_name: &str,
    ) -> Result<MigrationResult> {
        let deadline = Deadline::start(self.deadline);

        info!(
            "Migrating {} playlist {} into '{}'",
            source.name(),
            source_playlist_id,
            destination_name
        );

        let descriptors = within(
            deadline,
            source.list_track_descriptors(source_auth, source_playlist_id),
        )
        .await?;
        if descriptors.is_empty() {
            return Err(AppError::EmptyPlaylist(source_playlist_id.to_string()));
        }

        let description = format!(
            "Migrated from {} playlist {}",
            source.name(),
            source_playlist_id
        );
        let destination = within(
            deadline,
            self.destination
                .create_playlist(destination_auth, destination_name, &description),
        )
        .await?;

        let mut result = MigrationResult::new(
            source.name(),
            source_playlist_id,
            destination_name,
            &destination.id,
            descriptors.len(),
        );

        let filled = within(
            deadline,
            self.fill(destination_auth, &destination.id, &descriptors, &mut result),
        )
        .await;
        result.calculate_success_rate();

        if let Err(cause) = filled {
            warn!("Migration into '{}' incomplete: {}", destination_name, cause);
            return Err(AppError::MigrationIncomplete {
                result: Box::new(result),
                cause: Box::new(cause),
            });
        }

        info!(
            "Playlist migration completed: {} - {} ({:.1}% success rate)",
            destination_name,
            result.summary(),
            result.success_rate
        );

        Ok(result)
    }

    /// Resolves every descriptor and adds the matches to `destination_id`,
    /// recording progress in `result` as it goes.
    async fn fill(
        &self,
        destination_auth: &AuthContext,
        destination_id: &str,
        descriptors: &[ForeignTrackDescriptor],
        result: &mut MigrationResult,
    ) -> Result<()> {
        let resolver = TrackResolver::new(self.destination, self.search_fields);
        let mut matched_uris: Vec<String> = Vec::new();

        let pb = self.progress_bar(descriptors.len());
        for descriptor in descriptors {
            pb.set_message(descriptor.title.clone());

            match resolver.resolve(destination_auth, descriptor).await {
                MatchResult::Matched {
                    track, confidence, ..
                } => {
                    result.matched_count += 1;
                    if !is_confident_match(confidence) {
                        result.low_confidence.push(LowConfidenceMatch {
                            source: descriptor.to_string(),
                            matched_title: track.title.clone(),
                            matched_artist: track.artists.join(", "),
                            confidence,
                        });
                    }
                    matched_uris.push(track.uri);
                }
                MatchResult::Unmatched { descriptor } => {
                    result.unmatched_titles.push(descriptor.title);
                }
                MatchResult::SearchError { error, .. } => {
                    if error.is_auth_expired() {
                        warn!("Destination token rejected while searching: {}", error);
                    }
                    result.error_count += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        let batch = apply_in_chunks(&matched_uris, self.chunk_size, move |chunk| async move {
            self.destination
                .add_tracks(destination_auth, destination_id, &chunk)
                .await
        })
        .await;

        result.confirmation_token = batch.into_result(destination_id)?;
        Ok(())
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Finds a source playlist by exact id, falling back to a case-insensitive
/// name match.
pub async fn find_playlist<S: PlaylistSource + ?Sized>(
    source: &S,
    auth: &AuthContext,
    id_or_name: &str,
) -> Result<PlaylistSummary> {
    let playlists = source.list_playlists(auth).await?;

    let wanted = id_or_name.to_lowercase();
    let mut by_name = None;
    for playlist in playlists {
        if playlist.id == id_or_name {
            return Ok(playlist);
        }
        if by_name.is_none() && playlist.name.to_lowercase() == wanted {
            by_name = Some(playlist);
        }
    }

    by_name.ok_or_else(|| AppError::NotFound(id_or_name.to_string()))
}
