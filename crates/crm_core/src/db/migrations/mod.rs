//! Versioned schema for the CRM ledger.
//!
//! # Invariants
//! - Step versions are strictly increasing; the applied version lives in
//!   `PRAGMA user_version`.
//! - All pending steps run in one transaction.
//! - A store that fails `PRAGMA foreign_key_check` after migrating is
//!   refused, since a dangling owner would break every ownership operation.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "records",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "lookup_indexes",
        sql: include_str!("0002_lookup_indexes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to `latest_version()` and checks referential integrity.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    if from_version < latest {
        let tx = conn.transaction()?;
        for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
            debug!(
                "event=db_migrate module=db step={} version={}",
                step.name, step.version
            );
            tx.execute_batch(step.sql)?;
            tx.pragma_update(None, "user_version", step.version)?;
        }
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={}",
            from_version, latest
        );
    }

    ensure_no_dangling_references(conn)
}

fn ensure_no_dangling_references(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check;")?;
    let mut rows = stmt.query([])?;
    if let Some(row) = rows.next()? {
        return Err(DbError::DanglingReference {
            table: row.get(0)?,
            rowid: row.get(1)?,
            parent: row.get(2)?,
        });
    }
    Ok(())
}
