//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::models::BoardSnapshot;

/// Durable storage contract for the post collection.
///
/// The store writes the full document after every mutation and treats a
/// failed write as a logged warning, not an error: in-memory state stays
/// the source of truth for the running session, and a crash between
/// mutation and save loses at most the latest mutation.
#[async_trait]
pub trait SnapshotArchive: Send + Sync {
    /// Replaces the stored document with `snapshot`.
    async fn save(&self, snapshot: &BoardSnapshot) -> anyhow::Result<()>;

    /// Reads the stored document back; `None` when nothing has been
    /// written yet.
    async fn load(&self) -> anyhow::Result<Option<BoardSnapshot>>;
}

/// Stable anonymous identity contract for the current device.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the persisted identifier, creating and persisting a fresh
    /// one on first use. Idempotent across calls on the same device.
    async fn get_or_create(&self) -> anyhow::Result<String>;
}

/// Process-lifetime archive with no durability. Useful for tests and
/// ephemeral runs.
#[derive(Default)]
pub struct MemoryArchive {
    inner: Mutex<Option<BoardSnapshot>>,
}

#[async_trait]
impl SnapshotArchive for MemoryArchive {
    async fn save(&self, snapshot: &BoardSnapshot) -> anyhow::Result<()> {
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> anyhow::Result<Option<BoardSnapshot>> {
        let slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }
}
