//! # Router
//!
//! ```text
//! GET  /auth/github            -> 303 to GitHub (only when configured)
//! GET  /auth/github/callback   -> 303 to /
//! POST /auth/login             -> 200 probe | 401
//! POST /auth/register          -> 201 probe | 409
//! GET  /auth/logout            -> 303 to /
//! GET  /auth/test              -> 200 probe
//! *                            -> client build, 404 when missing
//! ```

use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::session::SessionConfig;
use crate::config::web::{CorsConfig, HttpConfig};
use crate::web::cors::build_cors;
use crate::web::fallback::not_found;
use crate::web::handlers;
use crate::web::state::AppState;

/// Builds the application router over the given session store.
///
/// The session cookie is signed, HTTP-only and `SameSite=Lax`. Every
/// response to a non-empty session re-saves it, so the TTL counts from the
/// last request and the cookie's `Max-Age` is renewed. Empty sessions get
/// no cookie.
pub fn build_router<S>(
    state: AppState,
    sessions: S,
    session: &SessionConfig,
    http: &HttpConfig,
    cors: &CorsConfig,
) -> Router
where
    S: SessionStore + Clone,
{
    let mut auth = Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/logout", get(handlers::logout))
        .route("/test", get(handlers::probe));

    if state.github.is_some() {
        auth = auth
            .route("/github", get(handlers::github_login))
            .route("/github/callback", get(handlers::github_callback));
    }

    let ttl = i64::try_from(session.ttl.as_secs()).unwrap_or(i64::MAX);
    let session_layer = SessionManagerLayer::new(sessions)
        .with_name(session.cookie_name.clone())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(session.cookie_secure)
        .with_expiry(Expiry::OnInactivity(::time::Duration::seconds(ttl)))
        .with_always_save(true)
        .with_signed(Key::from(session.secret.as_slice()));

    let static_files = ServeDir::new(&http.static_dir).not_found_service(not_found.into_service());

    Router::new()
        .nest("/auth", auth)
        .fallback_service(static_files)
        .layer(session_layer)
        .layer(build_cors(cors))
        .with_state(state)
}
