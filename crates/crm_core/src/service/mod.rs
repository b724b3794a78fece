//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Demarcate exactly one unit of work per mutating call.
//!
//! # Invariants
//! - A mutating call either commits all of its writes or none of them.
//! - Services never bypass repository validation.

pub mod archival_recorder;
pub mod customer_service;
pub mod employee_service;
pub mod entity_validator;
pub mod note_service;
pub mod orchestrator;

use crate::error::{CoreError, CoreResult};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use std::time::Instant;

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Runs `work` inside one IMMEDIATE transaction.
///
/// The write lock is taken up front, so reads performed by `work` cannot be
/// invalidated by a concurrent writer before the matching writes land.
/// Any error rolls back every write made by `work`.
pub(crate) fn in_transaction<T>(
    conn: &mut Connection,
    operation: &'static str,
    work: impl FnOnce(&Transaction<'_>) -> CoreResult<T>,
) -> CoreResult<T> {
    let started_at = Instant::now();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    match work(&tx) {
        Ok(value) => {
            tx.commit()?;
            debug!(
                "event=tx_commit module=service operation={} duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                error!(
                    "event=tx_rollback module=service status=error operation={} error={}",
                    operation, rollback_err
                );
            } else {
                warn!(
                    "event=tx_rollback module=service status=ok operation={} error_code={} duration_ms={}",
                    operation,
                    err.error_code(),
                    started_at.elapsed().as_millis()
                );
            }
            Err(err)
        }
    }
}

/// Rejects zero or negative identifiers with `InvalidArgument`.
pub fn ensure_positive_ids(message: &str, ids: &[i64]) -> CoreResult<()> {
    if ids.iter().any(|id| *id <= 0) {
        return Err(CoreError::invalid_argument(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_positive_ids;
    use crate::error::CoreError;

    #[test]
    fn positive_ids_pass() {
        assert!(ensure_positive_ids("ids", &[1, 42]).is_ok());
    }

    #[test]
    fn zero_and_negative_ids_are_invalid_arguments() {
        for ids in [[0, 1], [1, -3]] {
            let err = ensure_positive_ids("ids must be positive", &ids).unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument(message) if message == "ids must be positive"));
        }
    }
}
