use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_sessions::{ExpiredDeletion, MemoryStore};
use tracing_subscriber::EnvFilter;

use session_identity::auth::{GithubProvider, ProfileProvider};
use session_identity::config::app::AppConfig;
use session_identity::db::connection::get_pool;
use session_identity::db::mysql_adapter::MySqlDb;
use session_identity::db::port::Db;
use session_identity::session::MySqlSessionStore;
use session_identity::store::{MemoryUserStore, MySqlUserStore, UserStore};
use session_identity::time::SystemClock;
use session_identity::web::{build_router, AppState};

/// How often expired session rows are deleted.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

async fn delete_expired_sessions(store: MySqlSessionStore) {
    let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        tick.tick().await;
        if let Err(e) = store.delete_expired().await {
            tracing::warn!(error = %e, "expired session cleanup failed");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db: Option<Arc<dyn Db>> = if cfg.db.is_valid() {
        let pool = get_pool(&cfg.db)?;
        tracing::info!("using MySQL for users and sessions");
        Some(Arc::new(MySqlDb::new(pool)))
    } else {
        tracing::warn!("DATABASE_URL not set, users and sessions are kept in memory and lost on restart");
        None
    };

    let users: Arc<dyn UserStore> = match &db {
        Some(db) => Arc::new(MySqlUserStore::new(db.clone())),
        None => Arc::new(MemoryUserStore::new()),
    };

    if !cfg.session.secret_from_env {
        tracing::warn!("SESSION_SECRET not set, session cookies will not survive a restart");
    }

    let github: Option<Arc<dyn ProfileProvider>> = match &cfg.github {
        Some(gh) => Some(Arc::new(GithubProvider::new(gh)?)),
        None => {
            tracing::info!("GitHub OAuth not configured, federated login disabled");
            None
        }
    };

    let state = AppState::new(users, cfg.store_timeout, github);
    let app = match db {
        Some(db) => {
            let sessions = MySqlSessionStore::new(db, Arc::new(SystemClock));
            tokio::spawn(delete_expired_sessions(sessions.clone()));
            build_router(state, sessions, &cfg.session, &cfg.http, &cfg.cors)
        }
        None => build_router(state, MemoryStore::default(), &cfg.session, &cfg.http, &cfg.cors),
    };

    let listener = tokio::net::TcpListener::bind(&cfg.http.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.http.bind_addr))?;
    tracing::info!(addr = %cfg.http.bind_addr, static_dir = %cfg.http.static_dir.display(), "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
