pub mod auth;
pub mod batcher;
pub mod config;
pub mod deadline;
pub mod dedup;
pub mod error;
pub mod http;
pub mod matcher;
pub mod migrator;
pub mod models;
pub mod mood;
pub mod paginator;
pub mod provider;
pub mod resolver;
pub mod spotify;
pub mod youtube;

pub use auth::AuthContext;
pub use batcher::{BatchResult, MAX_CHUNK_SIZE, apply_in_chunks};
pub use config::Config;
pub use dedup::{DedupReport, find_duplicates, remove_duplicates};
pub use error::{AppError, Result};
pub use http::ApiClient;
pub use migrator::{MigrationOrchestrator, MigrationResult};
pub use models::{
    ForeignTrackDescriptor, PlaylistSummary, PlaylistTrackEntry, Track, TrackRemoval, UserProfile,
};
pub use mood::{
    Mood, MoodServiceClient, MoodShuffleOrchestrator, MoodSource, ShuffleOutcome, ShuffleRun,
    ShuffleState,
};
pub use paginator::{CursorPage, Page, fetch_all};
pub use provider::{PlaylistProvider, PlaylistSource};
pub use resolver::{MatchResult, SearchFields, TrackResolver};
pub use spotify::SpotifyClient;
pub use youtube::YoutubeClient;
