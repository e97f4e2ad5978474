//! # sb-ui
//!
//! Askama templates and view projections for the server-rendered board.
//! Handlers build `PostView`s for the requesting user so templates stay
//! free of domain logic.

use askama::Template;
use chrono::{DateTime, Utc};
use sb_core::models::{Post, Reply, VoteKind};

/// Render-ready projection of a Post for a particular viewer.
pub struct PostView {
    pub id: String,
    pub content_html: String,
    pub created: String,
    pub likes: u32,
    pub dislikes: u32,
    pub shares: u32,
    pub reply_count: usize,
    /// Whether the viewer's active vote is a like / a dislike.
    pub liked: bool,
    pub disliked: bool,
}

impl PostView {
    pub fn for_user(post: &Post, viewer_id: &str) -> Self {
        let vote = post.user_vote(viewer_id);
        Self {
            id: post.id.to_string(),
            content_html: render_content(&post.content),
            created: format_date(post.created_at),
            likes: post.likes,
            dislikes: post.dislikes,
            shares: post.shares,
            reply_count: post.reply_count(),
            liked: vote == Some(VoteKind::Like),
            disliked: vote == Some(VoteKind::Dislike),
        }
    }
}

pub struct ReplyView {
    pub content_html: String,
    pub created: String,
}

impl ReplyView {
    pub fn from_reply(reply: &Reply) -> Self {
        Self {
            content_html: render_content(&reply.content),
            created: format_date(reply.created_at),
        }
    }
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub title: String,
    pub posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub title: String,
    pub post: PostView,
    pub replies: Vec<ReplyView>,
}

/// Escapes user content for HTML and keeps line breaks visible.
/// Content is stored raw; escaping happens here and only here.
pub fn render_content(raw: &str) -> String {
    let escaped = html_escape::encode_safe(raw);
    escaped.lines().collect::<Vec<_>>().join("<br />")
}

pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %H:%M").to_string()
}
