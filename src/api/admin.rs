use reqwest::StatusCode;

use crate::client::{Client, RequestOptions};
use crate::error::Result;
use crate::types::{TopExercise, UserProfile, UserStats};

/// Admin dashboard data. Requires the admin role on the server.
#[derive(Debug)]
pub struct AdminApi<'a> {
    client: &'a Client,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// User count and the user list. 204 means no users.
    pub async fn user_stats(&self) -> Result<UserStats> {
        let response = self
            .client
            .request("/api/admin/stats/users", RequestOptions::get())
            .await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(UserStats::default());
        }
        Client::handle_response(response, "could not load user stats").await
    }

    /// Exercises ranked by how many routines use them.
    pub async fn exercise_ranking(&self) -> Result<Vec<TopExercise>> {
        let response = self
            .client
            .request("/api/admin/stats/exercises", RequestOptions::get())
            .await?;
        Client::handle_collection(response, "could not load exercise ranking").await
    }

    /// Every registered user.
    pub async fn users(&self) -> Result<Vec<UserProfile>> {
        let response = self
            .client
            .request("/api/admin/users", RequestOptions::get())
            .await?;
        Client::handle_collection(response, "could not load users").await
    }
}
