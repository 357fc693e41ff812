use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

mod app;
mod auth;
mod cache;
mod error;
mod http;
mod spa;

#[derive(Parser)]
#[command(name = "timbrapp-server", about = "TimbrApp backend server")]
struct Cli {
    /// Path to the TOML config file. Falls back to the TIMBRAPP_CONFIG env
    /// var, then ~/.timbrapp/timbrapp.toml.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timbrapp_server=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.or_else(|| std::env::var("TIMBRAPP_CONFIG").ok());
    let config = timbrapp_core::config::TimbrappConfig::load(config_path.as_deref())
        .unwrap_or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults", e);
            timbrapp_core::config::TimbrappConfig::default()
        });

    let bind = config.server.bind.clone();
    let port = config.server.port;

    // initialize SQLite database — single file for all subsystems
    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    // run all schema migrations (idempotent)
    timbrapp_users::db::init_db(&db)?;
    timbrapp_workforce::db::init_db(&db)?;
    timbrapp_planner::db::init_db(&db)?;
    timbrapp_tracking::db::init_db(&db)?;
    timbrapp_documents::db::init_db(&db)?;
    timbrapp_push::db::init_db(&db)?;
    info!("database migrations complete");

    // build subsystems — each gets its own connection for thread safety
    let users = timbrapp_users::UserStore::new(open_db(db_path)?);
    let workforce = timbrapp_workforce::WorkforceStore::new(open_db(db_path)?);
    let planner = timbrapp_planner::PlannerStore::new(open_db(db_path)?);
    let tracking = timbrapp_tracking::TrackingStore::new(open_db(db_path)?);
    let documents = timbrapp_documents::DocumentStore::new(open_db(db_path)?);
    let push_store = Arc::new(timbrapp_push::PushStore::new(open_db(db_path)?));
    let push = timbrapp_push::PushService::new(
        Arc::clone(&push_store),
        Arc::new(timbrapp_push::HttpPushSender::new()),
    );

    let state = Arc::new(app::AppState::new(
        config, users, workforce, planner, tracking, documents, push_store, push,
    ));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("TimbrApp server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn open_db(path: &str) -> rusqlite::Result<rusqlite::Connection> {
    let conn = rusqlite::Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
