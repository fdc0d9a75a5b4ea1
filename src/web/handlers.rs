//! Handlers of the `/auth` routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::identity::{Credentials, UserRecord};
use crate::session::SessionState;
use crate::web::session::SessionContext;
use crate::web::state::AppState;

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct LocalCredentials {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// `{ "isAuthenticated": bool, "user": UserRecord | {} }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProbe {
    pub is_authenticated: bool,
    pub user: ProbeUser,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProbeUser {
    User(UserRecord),
    Empty {},
}

impl From<&SessionState> for SessionProbe {
    fn from(state: &SessionState) -> Self {
        match state.user() {
            Some(user) => SessionProbe {
                is_authenticated: true,
                user: ProbeUser::User(user.clone()),
            },
            None => SessionProbe {
                is_authenticated: false,
                user: ProbeUser::Empty {},
            },
        }
    }
}

pub async fn probe(session: SessionContext) -> Result<Json<SessionProbe>, AuthError> {
    let state = session.state().await?;
    Ok(Json(SessionProbe::from(&state)))
}

pub async fn login(
    State(app): State<AppState>,
    session: SessionContext,
    Json(body): Json<LocalCredentials>,
) -> Result<Json<SessionProbe>, AuthError> {
    let user = app
        .resolver
        .resolve(Credentials::Local {
            id: body.id,
            secret: body.password,
        })
        .await?
        .into_result()?;

    let state = session.login(user).await?;
    Ok(Json(SessionProbe::from(&state)))
}

/// Creates a local account and logs it in.
pub async fn register(
    State(app): State<AppState>,
    session: SessionContext,
    Json(body): Json<LocalCredentials>,
) -> Result<(StatusCode, Json<SessionProbe>), AuthError> {
    let user = app.resolver.create(&body.id, &body.password).await?;

    let state = session.login(user).await?;
    Ok((StatusCode::CREATED, Json(SessionProbe::from(&state))))
}

/// Clears the session without consulting the user store.
pub async fn logout(session: SessionContext) -> Result<Redirect, AuthError> {
    if let Some(token) = session.token().await? {
        tracing::info!(user_id = %token, "logout");
    }
    session.logout().await?;
    Ok(Redirect::to("/"))
}

/// Starts the GitHub authorization-code flow.
pub async fn github_login(
    State(app): State<AppState>,
    session: SessionContext,
) -> Result<Redirect, AuthError> {
    let provider = app
        .github
        .as_ref()
        .ok_or_else(|| AuthError::Internal("GitHub login is not configured".into()))?;

    let (url, state) = provider.authorize_url();
    session.begin_oauth(state).await?;
    tracing::debug!(provider = provider.name(), "redirecting to identity provider");
    Ok(Redirect::to(&url))
}

/// Completes the GitHub flow. Any failure other than a transient store
/// outage sends the browser back to `/` unauthenticated.
pub async fn github_callback(
    State(app): State<AppState>,
    session: SessionContext,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AuthError> {
    let expected = session.take_oauth_state().await?;

    match complete_github(&app, expected, params).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "federated login");
            session.login(user).await?;
        }
        Err(e) if e.is_transient() => return Err(e),
        Err(e) => tracing::warn!(error = %e, "federated login failed"),
    }

    Ok(Redirect::to("/"))
}

async fn complete_github(
    app: &AppState,
    expected_state: Option<String>,
    params: CallbackParams,
) -> Result<UserRecord, AuthError> {
    let provider = app
        .github
        .as_ref()
        .ok_or_else(|| AuthError::Internal("GitHub login is not configured".into()))?;

    if let Some(error) = params.error {
        return Err(AuthError::Provider(format!("authorization denied: {error}")));
    }
    let (Some(code), Some(state)) = (params.code, params.state) else {
        return Err(AuthError::InvalidRequest("callback is missing code or state".into()));
    };
    if expected_state.as_deref() != Some(state.as_str()) {
        return Err(AuthError::InvalidRequest("OAuth state mismatch".into()));
    }

    let profile = provider.exchange(&code).await?;
    if profile.provider != provider.name() {
        return Err(AuthError::Provider(format!(
            "{} returned a profile for {}",
            provider.name(),
            profile.provider
        )));
    }
    app.resolver.resolve_federated(&profile).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AuthStrategy, UserId};

    #[test]
    fn anonymous_probe_has_empty_user_object() {
        let json = serde_json::to_value(SessionProbe::from(&SessionState::Anonymous)).unwrap();
        assert_eq!(json, serde_json::json!({ "isAuthenticated": false, "user": {} }));
    }

    #[test]
    fn authenticated_probe_embeds_record_without_hash() {
        let user = UserRecord {
            id: UserId::local("alice"),
            display_name: "alice".into(),
            auth_strategy: AuthStrategy::Local,
            profile_image_url: "https://example.com/a.png".into(),
            password_hash: Some("$argon2id$x".into()),
        };

        let json =
            serde_json::to_value(SessionProbe::from(&SessionState::Authenticated(user))).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["user"]["id"], "alice@local");
        assert_eq!(json["user"]["displayName"], "alice");
        assert!(json["user"].get("passwordHash").is_none());
    }
}
