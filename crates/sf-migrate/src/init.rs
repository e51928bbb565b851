//! Bounded-retry initialization
//!
//! First-time creation of schemas and the history table races against
//! every other process booting at the same moment. The work unit checks
//! whether its target already exists before creating anything, so a lost
//! race reads as success; everything else retries on a fixed backoff
//! until the attempt budget runs out, and the last failure propagates.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry policy for the one-time initialization path.
#[derive(Debug, Clone, Copy)]
pub struct InitRetry {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for InitRetry {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_secs(1),
        }
    }
}

impl InitRetry {
    /// Run `work` until it succeeds. Any failure is retried after the
    /// fixed backoff; the failure of the final attempt is returned as-is.
    pub async fn run<T, E, F, Fut>(&self, mut work: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempts = 0u32;
        loop {
            match work().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempts += 1;
                    if attempts >= self.max_attempts {
                        return Err(err);
                    }
                    log::debug!(
                        "initialization attempt {} failed ({}); retrying in {:?}",
                        attempts,
                        err,
                        self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
