use crate::client::{Client, RequestOptions, path_for};
use crate::error::Result;
use crate::types::{Exercise, ExerciseFilter, ExerciseInput};
use crate::validation;

/// Exercise catalogue. Creating, editing and deleting require the admin role
/// on the server.
#[derive(Debug)]
pub struct ExercisesApi<'a> {
    client: &'a Client,
}

impl<'a> ExercisesApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List every exercise.
    pub async fn list(&self) -> Result<Vec<Exercise>> {
        let response = self
            .client
            .request("/api/exercises", RequestOptions::get())
            .await?;
        Client::handle_collection(response, "could not load exercises").await
    }

    /// Get an exercise by ID.
    pub async fn get(&self, id: &str) -> Result<Exercise> {
        let response = self
            .client
            .request(&path_for(&["api", "exercises", id])?, RequestOptions::get())
            .await?;
        Client::handle_response(response, "could not load exercise").await
    }

    /// Search by name, category and muscle group. Blank fields are ignored.
    pub async fn filter(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        let options = RequestOptions::get().query(filter.query_pairs());
        let response = self
            .client
            .request("/api/exercises/filter", options)
            .await?;
        Client::handle_collection(response, "could not filter exercises").await
    }

    /// Create an exercise.
    pub async fn create(&self, input: &ExerciseInput) -> Result<Exercise> {
        validation::exercise_input(input)?;
        let response = self
            .client
            .request("/api/exercises", RequestOptions::post().json(input)?)
            .await?;
        Client::handle_response(response, "could not create exercise").await
    }

    /// Replace an exercise. The server echoes the edited fields without an ID.
    pub async fn update(&self, id: &str, input: &ExerciseInput) -> Result<serde_json::Value> {
        validation::exercise_input(input)?;
        let response = self
            .client
            .request(
                &path_for(&["api", "exercises", id])?,
                RequestOptions::put().json(input)?,
            )
            .await?;
        Client::handle_response(response, "could not update exercise").await
    }

    /// Delete an exercise.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .request(&path_for(&["api", "exercises", id])?, RequestOptions::delete())
            .await?;
        Client::handle_empty(response, "could not delete exercise").await
    }
}
