//! # Post Store
//!
//! The authoritative, ordered post collection and its state transitions.
//! Every operation validates first and mutates second, so a failed call
//! leaves the collection untouched. After each successful mutation the
//! full snapshot is mirrored to the injected archive.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{BoardSnapshot, Post, Reply, VoteKind};
use crate::traits::SnapshotArchive;

/// Maximum post length, counted in characters after trimming.
pub const MAX_POST_CHARS: usize = 280;

pub struct PostStore {
    /// Most-recent-created-first.
    posts: Vec<Post>,
    archive: Box<dyn SnapshotArchive>,
}

impl PostStore {
    /// An empty store backed by `archive`.
    pub fn new(archive: Box<dyn SnapshotArchive>) -> Self {
        Self {
            posts: Vec::new(),
            archive,
        }
    }

    /// Restores the collection from the archive, or starts empty when the
    /// archive holds nothing yet.
    pub async fn open(archive: Box<dyn SnapshotArchive>) -> Result<Self> {
        let snapshot = archive
            .load()
            .await
            .map_err(|err| AppError::Persistence(err.to_string()))?;
        Ok(Self {
            posts: snapshot.map(|s| s.posts).unwrap_or_default(),
            archive,
        })
    }

    /// Creates a post from `content`, prepending it to the collection.
    pub async fn create(&mut self, content: &str, author_id: Option<String>) -> Result<Post> {
        let content = validated_content(content, Some(MAX_POST_CHARS))?;
        let post = Post::new(content, author_id);
        self.posts.insert(0, post.clone());
        self.persist().await;
        Ok(post)
    }

    /// Advances the voter's vote machine on the post: set, retract on
    /// re-select, switch on the opposite choice.
    pub async fn vote(&mut self, post_id: Uuid, voter_id: &str, choice: VoteKind) -> Result<Post> {
        let post = self.find_mut(post_id)?;
        post.apply_vote(voter_id, choice);
        let updated = post.clone();
        self.persist().await;
        Ok(updated)
    }

    /// Bumps the share counter. Shares are not tied to voter identity, so
    /// repeated shares by the same user all count.
    pub async fn share(&mut self, post_id: Uuid) -> Result<Post> {
        let post = self.find_mut(post_id)?;
        post.shares += 1;
        let updated = post.clone();
        self.persist().await;
        Ok(updated)
    }

    /// Appends a reply to the post, in arrival order. Replies have no
    /// length cap.
    pub async fn reply(
        &mut self,
        post_id: Uuid,
        content: &str,
        author_id: Option<String>,
    ) -> Result<Reply> {
        let content = validated_content(content, None)?;
        let post = self.find_mut(post_id)?;
        let reply = Reply::new(content, author_id);
        post.replies.push(reply.clone());
        self.persist().await;
        Ok(reply)
    }

    /// All posts in store order, most-recent-created-first.
    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, post_id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// The full persisted document for the current state.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            posts: self.posts.clone(),
        }
    }

    fn find_mut(&mut self, post_id: Uuid) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| AppError::NotFound("Post".to_string(), post_id.to_string()))
    }

    /// Mirrors the collection to the archive. Failures are logged and
    /// swallowed; the in-memory mutation stands either way.
    async fn persist(&self) {
        if let Err(err) = self.archive.save(&self.snapshot()).await {
            log::warn!("snapshot save failed: {err:#}");
        }
    }
}

fn validated_content(raw: &str, max_chars: Option<usize>) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }
    if let Some(max) = max_chars {
        let chars = trimmed.chars().count();
        if chars > max {
            return Err(AppError::Validation(format!(
                "content is {chars} characters, the limit is {max}"
            )));
        }
    }
    Ok(trimmed.to_string())
}
