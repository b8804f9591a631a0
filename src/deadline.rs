use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{AppError, Result};

/// A whole-operation time limit, fixed when the operation starts so that
/// several steps can share it.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    limit: Duration,
    expires_at: Instant,
}

impl Deadline {
    pub fn start(limit: Option<Duration>) -> Option<Self> {
        limit.map(|limit| Self {
            limit,
            expires_at: Instant::now() + limit,
        })
    }
}

/// Runs `operation` to completion, or drops it once `deadline` passes.
/// Provider calls already sent are not recalled.
pub async fn within<F, T>(deadline: Option<Deadline>, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline.expires_at, operation)
            .await
            .map_err(|_| AppError::Timeout(deadline.limit))?,
        None => operation.await,
    }
}

/// Single-step form of [`within`], starting the clock now.
pub async fn with_deadline<F, T>(limit: Option<Duration>, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    within(Deadline::start(limit), operation).await
}
