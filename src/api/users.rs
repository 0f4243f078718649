use tracing::debug;

use crate::client::{Client, RequestOptions, path_for};
use crate::error::Result;
use crate::session::{SessionEvent, SessionState};
use crate::types::{
    PasswordChange, PasswordChangeResponse, ProfileUpdate, ProfileUpdateResponse, UserProfile,
};
use crate::validation;

/// User profile and credentials.
#[derive(Debug)]
pub struct UsersApi<'a> {
    client: &'a Client,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Get a user's profile.
    pub async fn get(&self, id: &str) -> Result<UserProfile> {
        let response = self
            .client
            .request(&path_for(&["api", "users", id])?, RequestOptions::get())
            .await?;
        Client::handle_response(response, "could not load profile").await
    }

    /// Edit a profile.
    ///
    /// On success the stored user record picks up the new user name and
    /// email; the tokens are left alone.
    pub async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<ProfileUpdateResponse> {
        validation::profile_update(update)?;
        let response = self
            .client
            .request(
                &path_for(&["api", "users", id])?,
                RequestOptions::put().json(update)?,
            )
            .await?;
        let updated: ProfileUpdateResponse =
            Client::handle_response(response, "could not update profile").await?;

        if let SessionState::LoggedIn(session) = self.client.state()? {
            let mut user = session.user;
            user.set("UserName", updated.user_name.clone());
            user.set("Email", updated.email.clone());
            self.client.transition(SessionEvent::ProfileUpdated(user))?;
            debug!(name: "session.profile_updated", "Stored user record updated");
        }
        Ok(updated)
    }

    /// Change the password and return the server's confirmation message.
    ///
    /// A wrong current password is a 401 on this endpoint. It comes back as
    /// an [`crate::Error::Api`] and the session stays intact.
    pub async fn change_password(&self, id: &str, change: &PasswordChange) -> Result<String> {
        validation::password_change(change)?;
        let response = self
            .client
            .request(
                &path_for(&["api", "users", id, "password"])?,
                RequestOptions::post().json(change)?,
            )
            .await?;
        let body: PasswordChangeResponse =
            Client::handle_response(response, "could not change password").await?;
        Ok(body
            .mensaje
            .unwrap_or_else(|| "password updated".to_string()))
    }
}
