use std::future::Future;

use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// Most items a provider accepts in one add/remove request.
pub const MAX_CHUNK_SIZE: usize = 100;

/// Outcome of a chunked mutation. `confirmation_token` belongs to the last
/// chunk that was applied; it is `None` when nothing was submitted or the
/// first chunk failed.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub confirmation_token: Option<String>,
    pub failed_at_chunk: Option<usize>,
    pub error: Option<AppError>,
    pub succeeded_chunks: usize,
    pub committed_items: usize,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Converts a failed batch into `PartialBatchFailure` for `playlist_id`.
    /// Applied chunks are reported, never undone.
    pub fn into_result(self, playlist_id: &str) -> Result<Option<String>> {
        match (self.error, self.failed_at_chunk) {
            (Some(cause), failed_at_chunk) => Err(AppError::PartialBatchFailure {
                playlist_id: playlist_id.to_string(),
                succeeded_chunks: self.succeeded_chunks,
                committed_items: self.committed_items,
                failed_at_chunk: failed_at_chunk.unwrap_or(self.succeeded_chunks),
                cause: Box::new(cause),
            }),
            (None, _) => Ok(self.confirmation_token),
        }
    }
}

/// Applies `apply_fn` to consecutive chunks of at most `chunk_size` items,
/// one chunk at a time and in order, stopping at the first failure.
pub async fn apply_in_chunks<T, F, Fut>(items: &[T], chunk_size: usize, mut apply_fn: F) -> BatchResult
where
    T: Clone,
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut result = BatchResult::default();

    if items.is_empty() {
        return result;
    }

    let chunk_size = chunk_size.max(1);
    let total_chunks = items.len().div_ceil(chunk_size);

    for (index, chunk) in items.chunks(chunk_size).enumerate() {
        match apply_fn(chunk.to_vec()).await {
            Ok(token) => {
                debug!("Applied chunk {}/{} ({} items)", index + 1, total_chunks, chunk.len());
                result.confirmation_token = Some(token);
                result.succeeded_chunks += 1;
                result.committed_items += chunk.len();
            }
            Err(e) => {
                warn!(
                    "Chunk {}/{} failed after {} items were applied: {}",
                    index + 1,
                    total_chunks,
                    result.committed_items,
                    e
                );
                result.failed_at_chunk = Some(index);
                result.error = Some(e);
                break;
            }
        }
    }

    result
}
