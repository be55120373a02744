pub mod prefs;
pub mod shelf;

#[cfg(test)]
mod tests;

pub use prefs::Preferences;
pub use shelf::Shelf;

use pixelfeed_core::{CoreError, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, warn};

/// SQLite-backed key-value store. Preferences and the shelf are JSON blobs
/// under fixed keys in a single `settings` table.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and prepare the connection pool.
    pub async fn connect(path: &Path) -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        debug!("Connected to database at {}", path.display());
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|_| StorageError::MigrationFailed {
            migration: "create_settings_table".to_string(),
        })?;

        Ok(())
    }

    pub async fn save_setting(&self, key: &str, value: &str) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sql)?;

        debug!("Saved setting {}", key);
        Ok(())
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, CoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sql)?;

        Ok(row.map(|(value,)| value))
    }

    pub async fn delete_setting(&self, key: &str) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sql)?;

        Ok(())
    }

    /// Store a value serialized as JSON under a fixed key.
    pub async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.save_setting(key, &json).await
    }

    /// Load a JSON value. Missing or unparsable blobs come back as None;
    /// a corrupt blob is logged, not fatal.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        let Some(raw) = self.get_setting(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Corrupt value under key {}: {}", key, e);
                Ok(None)
            }
        }
    }
}
