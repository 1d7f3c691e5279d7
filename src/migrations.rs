// Schema migrations tracked via PRAGMA user_version

use eyre::{Context, Result, eyre};
use rusqlite::Connection;
use tracing::{debug, info};

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: r#"
        CREATE TABLE IF NOT EXISTS lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL,
            text TEXT NOT NULL,
            is_checked INTEGER DEFAULT 0,
            FOREIGN KEY (list_id) REFERENCES lists (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_list_id ON tasks(list_id);
    "#,
}];

/// Latest schema version this binary knows how to produce
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

pub fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Apply every pending migration in one transaction
pub fn apply(conn: &mut Connection) -> Result<()> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(eyre!(
            "Database schema version {} is newer than supported {}",
            current,
            latest
        ));
    }

    if current == latest {
        debug!(version = current, "Schema up to date");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        debug!(version = migration.version, "Applying migration");
        tx.execute_batch(migration.sql)
            .with_context(|| format!("Failed to apply migration {}", migration.version))?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration.version))?;
    }
    tx.commit()?;

    info!(from = current, to = latest, "Schema migrated");
    Ok(())
}
