//! # sb-archive-json
//! sphere-board/crates/sb-plugins/sb-archive-json/src/lib.rs
//! JSON file implementation of `SnapshotArchive`.
//! One document per board, replaced atomically on every save.

use std::path::PathBuf;

use async_trait::async_trait;
use sb_core::models::BoardSnapshot;
use sb_core::traits::SnapshotArchive;
use tokio::fs;

pub struct JsonArchive {
    /// Location of the snapshot document (e.g., "./data/posts.json")
    path: PathBuf,
}

impl JsonArchive {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl SnapshotArchive for JsonArchive {
    /// Writes the document to a staging file, then renames it into place.
    /// A crash mid-write leaves the previous document intact.
    async fn save(&self, snapshot: &BoardSnapshot) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        fs::write(&staging, &json).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn load(&self) -> anyhow::Result<Option<BoardSnapshot>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
