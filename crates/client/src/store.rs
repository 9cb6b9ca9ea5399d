//! Persisted identity slots.
//!
//! String-keyed, string-valued slots that survive restarts. They are a cache:
//! read once at startup to pre-seed the session, written whenever the
//! identity is reloaded from the backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use quizdesk_core::{SessionIdentity, encode_staff_flag};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

pub const USERNAME_KEY: &str = "user.username";
pub const IS_STAFF_KEY: &str = "user.isStaff";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),

    #[error("identity store query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Durable key-value slots.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write all entries, or none of them.
    async fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;
}

/// Read the persisted identity; missing slots decode as anonymous.
pub async fn load_identity(store: &dyn IdentityStore) -> Result<SessionIdentity, StoreError> {
    let username = store.get(USERNAME_KEY).await?;
    let staff_flag = store.get(IS_STAFF_KEY).await?;
    Ok(SessionIdentity::from_persisted(
        username.as_deref(),
        staff_flag.as_deref(),
    ))
}

/// Mirror both identity fields into the store in one write.
pub async fn save_identity(
    store: &dyn IdentityStore,
    username: &str,
    is_staff: bool,
) -> Result<(), StoreError> {
    store
        .set_all(&[
            (USERNAME_KEY, username),
            (IS_STAFF_KEY, encode_staff_flag(is_staff)),
        ])
        .await
}

/// Process-local store, used by tests and as a fallback when no disk is available.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with raw slot values.
    pub fn with_slots<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let slots = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            slots: Mutex::new(slots),
        }
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.slots.lock().clone()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.lock().get(key).cloned())
    }

    async fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut slots = self.slots.lock();
        for (key, value) in entries {
            slots.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}

/// SQLite-backed slots (one row per key).
#[derive(Debug, Clone)]
pub struct SqliteIdentityStore {
    pool: SqlitePool,
}

impl SqliteIdentityStore {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::init(pool).await
    }

    /// Fresh database that lives as long as the store.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // Every connection to `:memory:` is a separate database; keep exactly one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS identity_slots (
                key        TEXT NOT NULL PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM identity_slots
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO identity_slots (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key)
                DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(*value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Resolve the default database path: `{app_data_dir}/quizdesk/identity.db`.
pub fn default_store_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        }))
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("quizdesk");
    path.push("identity.db");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_restores_anonymous() {
        let store = MemoryIdentityStore::new();
        let identity = load_identity(&store).await.unwrap();
        assert_eq!(identity, SessionIdentity::anonymous());
    }

    #[tokio::test]
    async fn memory_store_round_trips_identity() {
        let store = MemoryIdentityStore::new();
        save_identity(&store, "bob", true).await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.get(USERNAME_KEY).map(String::as_str), Some("bob"));
        assert_eq!(snapshot.get(IS_STAFF_KEY).map(String::as_str), Some("true"));

        let identity = load_identity(&store).await.unwrap();
        assert_eq!(identity, SessionIdentity::new("bob", true));
    }

    #[tokio::test]
    async fn tampered_staff_flag_without_username_grants_nothing() {
        let store = MemoryIdentityStore::with_slots([(IS_STAFF_KEY, "true")]);
        let identity = load_identity(&store).await.unwrap();
        assert!(!identity.is_authenticated());
        assert!(!identity.is_staff());
    }

    #[tokio::test]
    async fn sqlite_store_overwrites_slots() {
        let store = SqliteIdentityStore::in_memory().await.unwrap();
        assert_eq!(store.get(USERNAME_KEY).await.unwrap(), None);

        save_identity(&store, "alice", false).await.unwrap();
        save_identity(&store, "bob", true).await.unwrap();

        assert_eq!(store.get(USERNAME_KEY).await.unwrap().as_deref(), Some("bob"));
        assert_eq!(store.get(IS_STAFF_KEY).await.unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn sqlite_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!(
            "quizdesk-store-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = dir.join("identity.db");

        {
            let store = SqliteIdentityStore::open(&path).await.unwrap();
            save_identity(&store, "carol", false).await.unwrap();
            store.pool.close().await;
        }

        let reopened = SqliteIdentityStore::open(&path).await.unwrap();
        let identity = load_identity(&reopened).await.unwrap();
        assert_eq!(identity, SessionIdentity::new("carol", false));

        reopened.pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
