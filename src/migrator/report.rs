use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    pub source_provider: String,
    pub source_playlist_id: String,
    pub destination_name: String,
    pub destination_playlist_id: String,
    pub total_tracks: usize,
    pub matched_count: usize,
    pub unmatched_titles: Vec<String>,
    pub error_count: usize,
    pub success_rate: f64,
    pub low_confidence: Vec<LowConfidenceMatch>,
    pub confirmation_token: Option<String>,
}

/// A match accepted from the top search hit that looks unlike the source track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowConfidenceMatch {
    pub source: String,
    pub matched_title: String,
    pub matched_artist: String,
    pub confidence: f64,
}

impl MigrationResult {
    pub fn new(
        source_provider: &str,
        source_playlist_id: &str,
        destination_name: &str,
        destination_playlist_id: &str,
        total_tracks: usize,
    ) -> Self {
        Self {
            source_provider: source_provider.to_string(),
            source_playlist_id: source_playlist_id.to_string(),
            destination_name: destination_name.to_string(),
            destination_playlist_id: destination_playlist_id.to_string(),
            total_tracks,
            matched_count: 0,
            unmatched_titles: Vec::new(),
            error_count: 0,
            success_rate: 0.0,
            low_confidence: Vec::new(),
            confirmation_token: None,
        }
    }

    pub fn calculate_success_rate(&mut self) {
        if self.total_tracks > 0 {
            self.success_rate = (self.matched_count as f64 / self.total_tracks as f64) * 100.0;
        }
    }

    /// One-line count summary, e.g. `3 tracks: 2 matched, 1 unmatched, 0 errors`.
    pub fn summary(&self) -> String {
        format!(
            "{} tracks: {} matched, {} unmatched, {} errors",
            self.total_tracks,
            self.matched_count,
            self.unmatched_titles.len(),
            self.error_count
        )
    }
}

/// Writes `results` as pretty JSON to a timestamped file in `dir`.
pub fn save_migration_results(dir: &Path, results: &[MigrationResult]) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    fs::create_dir_all(dir)?;

    let filename = dir.join(format!("migration_results_{}.json", timestamp));
    let json = serde_json::to_string_pretty(results)?;

    fs::write(&filename, json)?;

    info!("Migration results saved to: {}", filename.display());

    Ok(filename)
}
