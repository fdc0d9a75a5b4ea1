//! # Federated Identity Providers
//!
//! The authorization-code exchange is opaque to the identity core: a
//! [`ProfileProvider`] turns a callback `code` into a [`FederatedProfile`]
//! and nothing else crosses the seam.
//!
//! [`GithubProvider`] implements it with the `oauth2` crate for the token
//! exchange and a plain `reqwest` call to `https://api.github.com/user`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::config::oauth::OAuthProviderConfig;
use crate::error::AuthError;
use crate::identity::FederatedProfile;

pub const GITHUB_PROVIDER: &str = "github";

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Upper bound on each call to GitHub (token exchange, user lookup).
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Provider name; becomes the strategy suffix of user ids.
    fn name(&self) -> &str;

    /// Authorization URL to redirect the browser to, and the `state` value
    /// the callback must echo back.
    fn authorize_url(&self) -> (String, String);

    async fn exchange(&self, code: &str) -> Result<FederatedProfile, AuthError>;
}

type GithubClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    avatar_url: Option<String>,
}

impl GithubUser {
    fn into_profile(self) -> FederatedProfile {
        FederatedProfile {
            username: self.login,
            provider: GITHUB_PROVIDER.to_string(),
            photos: self.avatar_url.into_iter().collect(),
        }
    }
}

pub struct GithubProvider {
    client: GithubClient,
    http: reqwest::Client,
}

impl GithubProvider {
    pub fn new(config: &OAuthProviderConfig) -> anyhow::Result<Self> {
        Self::with_timeout(config, PROVIDER_TIMEOUT)
    }

    pub fn with_timeout(config: &OAuthProviderConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(GITHUB_AUTH_URL.to_string())?)
            .set_token_uri(TokenUrl::new(GITHUB_TOKEN_URL.to_string())?)
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone())
                    .context("GITHUB_CALLBACK_URL is not a valid URL")?,
            );

        // The token endpoint must not be allowed to redirect (SSRF guard
        // recommended by the oauth2 crate).
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client for GitHub")?;

        Ok(Self { client, http })
    }
}

#[async_trait]
impl ProfileProvider for GithubProvider {
    fn name(&self) -> &str {
        GITHUB_PROVIDER
    }

    fn authorize_url(&self) -> (String, String) {
        let (url, state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("read:user".to_string()))
            .url();
        (url.to_string(), state.secret().to_string())
    }

    async fn exchange(&self, code: &str) -> Result<FederatedProfile, AuthError> {
        tracing::debug!("exchanging GitHub authorization code");

        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::Provider(format!("token exchange failed: {e}")))?;

        let user = self.fetch_user(GITHUB_USER_URL, token.access_token().secret()).await?;

        tracing::debug!(login = %user.login, "GitHub profile fetched");
        Ok(user.into_profile())
    }
}

impl GithubProvider {
    async fn fetch_user(&self, url: &str, access_token: &str) -> Result<GithubUser, AuthError> {
        self.http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AuthError::Provider(format!("GitHub user request failed: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("GitHub user response malformed: {e}")))
    }
}
