use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use axum::{
    http::StatusCode,
    routing::{get, get_service, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

mod db;
mod error;
mod extractors;
mod fuzz;
mod handlers;

pub use error::Error;
use extractors::*;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Directory holding the built web front-end, served for any path that
    /// is not an API endpoint
    #[structopt(long)]
    static_dir: Option<PathBuf>,
}

pub async fn create_sqlx_pool(db_url: &str) -> anyhow::Result<sqlx::SqlitePool> {
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(8)
        .connect(db_url)
        .await
        .with_context(|| format!("opening database {db_url:?}"))
}

pub fn app(db: sqlx::SqlitePool) -> Router {
    let state = AppState {
        db: DbPool::new(db),
    };
    Router::new()
        .route(folio_api::LIST_COMMENTS, get(handlers::list_comments))
        .route(folio_api::DELETE_COMMENT, post(handlers::delete_comment))
        .route(
            folio_api::DELETE_ALL_COMMENTS,
            post(handlers::delete_all_comments),
        )
        .route(folio_api::CONTACT_ME, post(handlers::contact_me))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let db = create_sqlx_pool(&db_url).await?;
    MIGRATOR
        .run(&db)
        .await
        .context("running pending migrations")?;

    let mut app = app(db);
    if let Some(dir) = opt.static_dir {
        tracing::info!(?dir, "serving static files");
        app = app.fallback_service(get_service(ServeDir::new(dir)).handle_error(
            |err: std::io::Error| async move {
                tracing::error!(?err, "failed serving static file");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed serving static file")
            },
        ));
    }
    let app = app.layer(TraceLayer::new_for_http());

    tracing::info!("listening on {}", opt.listen);
    axum::Server::bind(&opt.listen)
        .serve(app.into_make_service())
        .await
        .context("serving axum webserver")
}
