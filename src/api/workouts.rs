use crate::client::{Client, RequestOptions, path_for};
use crate::error::Result;
use crate::types::{Workout, WorkoutStats};

/// Completed routines and training statistics.
#[derive(Debug)]
pub struct WorkoutsApi<'a> {
    client: &'a Client,
}

impl<'a> WorkoutsApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List the current user's workouts. The backend answers 404 when the
    /// user has none.
    pub async fn list(&self) -> Result<Vec<Workout>> {
        let response = self
            .client
            .request("/api/workouts", RequestOptions::get())
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        Client::handle_collection(response, "could not load workouts").await
    }

    /// Get a workout by ID.
    pub async fn get(&self, id: &str) -> Result<Workout> {
        let response = self
            .client
            .request(&path_for(&["api", "workouts", id])?, RequestOptions::get())
            .await?;
        Client::handle_response(response, "could not load workout").await
    }

    /// Mark a routine as completed now.
    pub async fn complete(&self, routine_id: &str) -> Result<Workout> {
        let response = self
            .client
            .request(&path_for(&["api", "workouts", routine_id])?, RequestOptions::post())
            .await?;
        Client::handle_response(response, "could not record workout").await
    }

    /// Delete a workout.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .request(&path_for(&["api", "workouts", id])?, RequestOptions::delete())
            .await?;
        Client::handle_empty(response, "could not delete workout").await
    }

    /// Totals, weekly frequency, most used routines and monthly progress.
    pub async fn stats(&self) -> Result<WorkoutStats> {
        let response = self
            .client
            .request("/api/workouts/stats", RequestOptions::get())
            .await?;
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(WorkoutStats::default());
        }
        Client::handle_response(response, "could not load workout stats").await
    }
}
