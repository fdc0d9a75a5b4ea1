use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Answer for paths that neither an `/auth` route nor a file of the client
/// build matches.
pub async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
