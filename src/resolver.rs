use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::error::{AppError, Result};
use crate::matcher::calculate_similarity;
use crate::models::{ForeignTrackDescriptor, Track};
use crate::provider::PlaylistProvider;

/// Which descriptor fields go into the search query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchFields {
    /// Title plus artist and album when present.
    #[default]
    Full,
    TitleOnly,
}

impl FromStr for SearchFields {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" | "all" => Ok(SearchFields::Full),
            "title" | "title-only" | "title_only" => Ok(SearchFields::TitleOnly),
            other => Err(AppError::Config(format!(
                "Unknown search fields '{}', expected 'full' or 'title'",
                other
            ))),
        }
    }
}

#[derive(Debug)]
pub enum MatchResult {
    Matched {
        descriptor: ForeignTrackDescriptor,
        track: Track,
        confidence: f64,
    },
    Unmatched {
        descriptor: ForeignTrackDescriptor,
    },
    SearchError {
        descriptor: ForeignTrackDescriptor,
        error: AppError,
    },
}

impl MatchResult {
    pub fn descriptor(&self) -> &ForeignTrackDescriptor {
        match self {
            MatchResult::Matched { descriptor, .. }
            | MatchResult::Unmatched { descriptor }
            | MatchResult::SearchError { descriptor, .. } => descriptor,
        }
    }

    pub fn matched_track(&self) -> Option<&Track> {
        match self {
            MatchResult::Matched { track, .. } => Some(track),
            _ => None,
        }
    }
}

/// Resolves foreign descriptors to native tracks using the target
/// provider's top search hit.
pub struct TrackResolver<'a, P: PlaylistProvider + ?Sized> {
    provider: &'a P,
    fields: SearchFields,
}

impl<'a, P: PlaylistProvider + ?Sized> TrackResolver<'a, P> {
    pub fn new(provider: &'a P, fields: SearchFields) -> Self {
        Self { provider, fields }
    }

    /// The query actually sent for `descriptor` under this resolver's fields.
    pub fn query_for(&self, descriptor: &ForeignTrackDescriptor) -> ForeignTrackDescriptor {
        match self.fields {
            SearchFields::Full => descriptor.clone(),
            SearchFields::TitleOnly => ForeignTrackDescriptor::new(descriptor.title.clone()),
        }
    }

    pub async fn resolve(&self, auth: &AuthContext, descriptor: &ForeignTrackDescriptor) -> MatchResult {
        let query = self.query_for(descriptor);

        match self.provider.search_track(auth, &query).await {
            Ok(Some(track)) if !track.id.is_empty() => {
                let confidence = calculate_similarity(descriptor, &track);
                debug!(
                    "Matched {} -> {} ({:.2})",
                    descriptor, track.id, confidence
                );
                MatchResult::Matched {
                    descriptor: descriptor.clone(),
                    track,
                    confidence,
                }
            }
            Ok(_) => {
                debug!("No match found for: {}", descriptor);
                MatchResult::Unmatched {
                    descriptor: descriptor.clone(),
                }
            }
            Err(error) => {
                warn!("Search failed for {}: {}", descriptor, error);
                MatchResult::SearchError {
                    descriptor: descriptor.clone(),
                    error,
                }
            }
        }
    }

    /// Resolves each descriptor in turn. A failed search is recorded for
    /// that descriptor and the loop moves on.
    pub async fn resolve_all(
        &self,
        auth: &AuthContext,
        descriptors: &[ForeignTrackDescriptor],
    ) -> Vec<MatchResult> {
        let mut results = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            results.push(self.resolve(auth, descriptor).await);
        }
        results
    }
}
