//! # sphere-board Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::env;
use std::path::PathBuf;

use actix_web::{web, App, HttpServer};
use sb_api::handlers::AppState;
use sb_api::middleware;
use sb_core::store::PostStore;
use sb_core::traits::SnapshotArchive;
use sb_identity_local::LocalIdentityProvider;
use tokio::sync::RwLock;

#[cfg(feature = "archive-json")]
use sb_archive_json::JsonArchive;

#[cfg(all(feature = "archive-sqlite", not(feature = "archive-json")))]
use sb_archive_sqlite::SqliteArchive;

#[cfg(not(any(feature = "archive-json", feature = "archive-sqlite")))]
compile_error!("select an archive feature: archive-json or archive-sqlite");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let data_dir =
        PathBuf::from(env::var("SPHERE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
    let bind_addr = env::var("SPHERE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    std::fs::create_dir_all(&data_dir)?;

    // 1. Initialize the snapshot archive implementation
    #[cfg(feature = "archive-json")]
    let archive: Box<dyn SnapshotArchive> = Box::new(JsonArchive::new(data_dir.join("posts.json")));

    #[cfg(all(feature = "archive-sqlite", not(feature = "archive-json")))]
    let archive: Box<dyn SnapshotArchive> = Box::new(
        SqliteArchive::new(&format!("sqlite:{}", data_dir.join("board.db").display())).await?,
    );

    // 2. Restore the board from the archive
    let store = PostStore::open(archive).await?;
    log::info!("restored {} post(s) from the archive", store.list().len());

    // 3. Initialize the anonymous identity provider
    let identity = LocalIdentityProvider::new(data_dir.join("user_id"));

    // 4. Wrap in AppState (dynamic dispatch keeps the plugins swappable)
    let state = web::Data::new(AppState {
        store: RwLock::new(store),
        identity: Box::new(identity),
    });

    log::info!("sphere-board listening on http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .app_data(state.clone())
            .configure(sb_api::configure_routes)
    })
    .bind(bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
