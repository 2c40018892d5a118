//! Forward-only schema migrations tracked in `connectsphere_schema`.

use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension};

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// Applied in order; a migration's version is its position plus one.
const MIGRATIONS: &[Migration] = &[Migration {
    name: "001_init",
    sql: include_str!("../migrations/001_init.sql"),
}];

pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS connectsphere_schema (version INTEGER NOT NULL);
         INSERT INTO connectsphere_schema (version)
           SELECT 0 WHERE NOT EXISTS (SELECT 1 FROM connectsphere_schema);",
    )?;

    let applied = schema_version(&tx)?;
    if applied > latest_version() {
        return Err(StoreError::Migration(format!(
            "database schema {applied} is newer than this build ({})",
            latest_version()
        )));
    }

    for (version, migration) in (1_i64..).zip(MIGRATIONS).skip(applied as usize) {
        tracing::debug!(migration = migration.name, version, "applying migration");
        tx.execute_batch(migration.sql)?;
        tx.execute("UPDATE connectsphere_schema SET version = ?1;", [version])?;
    }

    tx.commit()?;
    Ok(())
}

/// Zero for a database that has never been migrated.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let table: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'connectsphere_schema';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if table.is_none() {
        return Ok(0);
    }
    let version: Option<i64> = conn
        .query_row("SELECT MAX(version) FROM connectsphere_schema;", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}
