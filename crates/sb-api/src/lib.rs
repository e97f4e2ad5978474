//! # sb-api
//!
//! The web routing and orchestration layer for sphere-board.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the board.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // The flat list view (fallback for clients without a 3D canvas)
            .route("/", web::get().to(handlers::board_index))
            // Snapshot dump for programmatic clients and 3D renderers
            .route("/api/posts", web::get().to(handlers::api_posts))
            // Posting and engagement endpoints
            .route("/post", web::post().to(handlers::create_post))
            .route("/post/{id}", web::get().to(handlers::post_detail))
            .route("/post/{id}/vote", web::post().to(handlers::vote_post))
            .route("/post/{id}/share", web::post().to(handlers::share_post))
            .route("/post/{id}/reply", web::post().to(handlers::reply_post)),
    );
}
