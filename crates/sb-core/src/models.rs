//! # Domain Models
//!
//! These structs represent the core entities of sphere-board.
//! We use UUID v7 for time-ordered, globally unique identification.
//! Field names serialize in camelCase to match the persisted snapshot
//! document; older documents may omit `userVotes`, `replies`, or
//! `authorId`, which default to empty on load.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's active vote on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

/// A reply attached to a post. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

impl Reply {
    pub fn new(content: String, author_id: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            content,
            created_at: Utc::now(),
            author_id,
        }
    }
}

/// A single anonymous message pinned to a fixed point on the unit sphere.
///
/// `likes` and `dislikes` are a cached view of `user_votes`; every
/// transition keeps them in sync. The reply count is derived from
/// `replies`, never stored separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub likes: u32,
    pub dislikes: u32,
    pub shares: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub user_votes: HashMap<String, VoteKind>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Post {
    /// Creates a post at a freshly sampled point on the sphere surface,
    /// with all counters zeroed. Content is assumed validated.
    pub fn new(content: String, author_id: Option<String>) -> Self {
        let (x, y, z) = random_unit_vector();
        Self {
            id: Uuid::now_v7(),
            content,
            x,
            y,
            z,
            likes: 0,
            dislikes: 0,
            shares: 0,
            created_at: Utc::now(),
            author_id,
            user_votes: HashMap::new(),
            replies: Vec::new(),
        }
    }

    /// The voter's current vote on this post, if any.
    pub fn user_vote(&self, voter_id: &str) -> Option<VoteKind> {
        self.user_votes.get(voter_id).copied()
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Applies one step of the vote machine: select to set, re-select the
    /// same choice to retract, select the opposite to switch. At most one
    /// vote per voter is active at any time.
    pub fn apply_vote(&mut self, voter_id: &str, choice: VoteKind) {
        match self.user_vote(voter_id) {
            Some(current) if current == choice => {
                self.user_votes.remove(voter_id);
                match choice {
                    VoteKind::Like => self.likes = self.likes.saturating_sub(1),
                    VoteKind::Dislike => self.dislikes = self.dislikes.saturating_sub(1),
                }
            }
            Some(_) => {
                self.user_votes.insert(voter_id.to_string(), choice);
                match choice {
                    VoteKind::Like => {
                        self.dislikes = self.dislikes.saturating_sub(1);
                        self.likes += 1;
                    }
                    VoteKind::Dislike => {
                        self.likes = self.likes.saturating_sub(1);
                        self.dislikes += 1;
                    }
                }
            }
            None => {
                self.user_votes.insert(voter_id.to_string(), choice);
                match choice {
                    VoteKind::Like => self.likes += 1,
                    VoteKind::Dislike => self.dislikes += 1,
                }
            }
        }
    }
}

/// The full persisted document: every post, most-recent-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub posts: Vec<Post>,
}

/// Samples a direction uniformly over spherical coordinates
/// (phi in [0, 2pi), theta in [0, pi)).
fn random_unit_vector() -> (f64, f64, f64) {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let phi: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
    let theta: f64 = rng.gen::<f64>() * std::f64::consts::PI;
    (
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    )
}
