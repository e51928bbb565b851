//! Transactional execution template
//!
//! Success commits, any error rolls back; the work's own error is always
//! the one propagated.

use std::future::Future;

use crate::error::DbError;
use crate::traits::Database;

/// Run `work` inside a transaction on `db`.
///
/// The work unit captures the same `&dyn Database` it runs against; a
/// rollback failure after a failed work unit is logged, not propagated,
/// so the original failure stays visible.
pub async fn within_transaction<T, E, F, Fut>(db: &dyn Database, work: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<DbError>,
{
    db.begin().await?;
    match work().await {
        Ok(value) => {
            db.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = db.rollback().await {
                log::warn!("rollback after failed work unit also failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}
