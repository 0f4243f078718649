use tracing::{info, warn};

use crate::client::{Client, RequestOptions};
use crate::error::{Error, Result};
use crate::session::{REFRESH_TOKEN_KEY, Session, SessionEvent, UserRecord};
use crate::types::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest};
use crate::validation;

/// Login, registration, token refresh and server-side logout.
#[derive(Debug)]
pub struct AuthApi<'a> {
    client: &'a Client,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Log in and store the new session.
    ///
    /// Wrong credentials come back as an [`Error::Api`] with status 401; they
    /// never go through the expired-session policy.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord> {
        validation::login(email, password)?;
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .request_public("/login", RequestOptions::post().json(&body)?)
            .await?;
        let login: LoginResponse = Client::handle_response(response, "login failed").await?;

        let user = login.user;
        self.client.transition(SessionEvent::LoggedIn(Session {
            access_token: login.access_token,
            refresh_token: login.refresh_token,
            user: user.clone(),
        }))?;
        info!(name: "session.login", user_id = user.id().unwrap_or_default(), "Logged in");
        Ok(user)
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, req: &RegisterRequest) -> Result<serde_json::Value> {
        validation::registration(req)?;
        let response = self
            .client
            .request_public("/register", RequestOptions::post().json(req)?)
            .await?;
        Client::handle_response(response, "registration failed").await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// A rejected refresh token means the session is over and is handled
    /// exactly like an expired access token.
    ///
    /// Without a complete session to refresh (no user record, or no
    /// refresh token) the session is expired the same way.
    pub async fn refresh(&self) -> Result<String> {
        let Some(refresh_token) = self
            .client
            .state()?
            .session()
            .map(|s| s.refresh_token.clone())
            .filter(|t| !t.is_empty())
        else {
            self.client.expire_session();
            return Err(Error::Unauthorized);
        };

        let response = self
            .client
            .request_public(
                "/refresh",
                RequestOptions::post().json(&RefreshRequest { refresh_token })?,
            )
            .await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.client.expire_session();
            return Err(Error::Unauthorized);
        }
        let refreshed: RefreshResponse =
            Client::handle_response(response, "token refresh failed").await?;

        self.client
            .transition(SessionEvent::TokenRefreshed(refreshed.access_token.clone()))?;
        info!(name: "session.refreshed", "Access token refreshed");
        Ok(refreshed.access_token)
    }

    /// Revoke the refresh token on the server, then [`Client::logout`].
    ///
    /// The local session is cleared even if the server call fails.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(refresh_token) = self.client.store().get(REFRESH_TOKEN_KEY)? {
            if let Err(e) = self.revoke(refresh_token).await {
                warn!(name: "session.revoke_failed", error = %e, "Server logout failed");
            }
        }
        self.client.logout()
    }

    async fn revoke(&self, refresh_token: String) -> Result<()> {
        let options = RequestOptions::post().json(&RefreshRequest { refresh_token })?;
        let response = self.client.request_public("/logout", options).await?;
        Client::handle_empty(response, "logout failed").await
    }
}
