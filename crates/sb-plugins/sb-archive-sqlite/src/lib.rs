//! # sb-archive-sqlite
//! sphere-board/crates/sb-plugins/sb-archive-sqlite/src/lib.rs
//! SQLite implementation of `SnapshotArchive`.
//!
//! The database is used as a key-value table holding the snapshot
//! document under a single well-known key. This keeps the persisted
//! layout identical to the JSON archive; only the container differs.

use std::str::FromStr;

use async_trait::async_trait;
use sb_core::models::BoardSnapshot;
use sb_core::traits::SnapshotArchive;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

/// Key the snapshot document lives under.
const POSTS_KEY: &str = "posts";

pub struct SqliteArchive {
    pool: SqlitePool,
}

impl SqliteArchive {
    /// Connects to `url` (e.g., "sqlite:board.db" or "sqlite::memory:"),
    /// creating the database file and the kv table if missing.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // One writer is all the board ever has; a single connection also
        // keeps ":memory:" databases alive across queries.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query("CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SnapshotArchive for SqliteArchive {
    async fn save(&self, snapshot: &BoardSnapshot) -> anyhow::Result<()> {
        let json = serde_json::to_string(snapshot)?;

        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(POSTS_KEY)
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&self) -> anyhow::Result<Option<BoardSnapshot>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(POSTS_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let value: String = row.get("value");
                Ok(Some(serde_json::from_str(&value)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::models::Post;

    fn snapshot_with(content: &str) -> BoardSnapshot {
        BoardSnapshot {
            posts: vec![Post::new(content.to_string(), None)],
        }
    }

    #[tokio::test]
    async fn load_is_none_on_a_fresh_database() {
        let archive = SqliteArchive::new("sqlite::memory:").await.unwrap();
        assert!(archive.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let archive = SqliteArchive::new("sqlite::memory:").await.unwrap();

        let snapshot = snapshot_with("kv backed");
        archive.save(&snapshot).await.unwrap();

        let loaded = archive.load().await.unwrap().unwrap();
        assert_eq!(loaded.posts.len(), 1);
        assert_eq!(loaded.posts[0].id, snapshot.posts[0].id);
    }

    #[tokio::test]
    async fn save_upserts_rather_than_appending() {
        let archive = SqliteArchive::new("sqlite::memory:").await.unwrap();

        archive.save(&snapshot_with("first")).await.unwrap();
        archive.save(&snapshot_with("second")).await.unwrap();

        let loaded = archive.load().await.unwrap().unwrap();
        assert_eq!(loaded.posts.len(), 1);
        assert_eq!(loaded.posts[0].content, "second");
    }
}
