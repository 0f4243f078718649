use reqwest::StatusCode;

use crate::client::{Client, RequestOptions, path_for};
use crate::error::{Error, Result};
use crate::types::{
    Routine, RoutineExercise, RoutineExerciseRef, RoutineExerciseUpdate, RoutineName,
};
use crate::validation;

/// Routines owned by the logged-in user.
#[derive(Debug)]
pub struct RoutinesApi<'a> {
    client: &'a Client,
}

impl<'a> RoutinesApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List routines. The backend answers 204 or 404 when there are none.
    pub async fn list(&self) -> Result<Vec<Routine>> {
        let response = self
            .client
            .request("/api/routines", RequestOptions::get())
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        Client::handle_collection(response, "could not load routines").await
    }

    /// Routines created by the current user.
    ///
    /// Returns an empty list when there is no current user (which has
    /// already triggered a logout).
    pub async fn mine(&self) -> Result<Vec<Routine>> {
        let Some(user) = self.client.current_user()? else {
            return Ok(Vec::new());
        };
        let Some(user_id) = user.id().map(str::to_string) else {
            return Ok(Vec::new());
        };
        let routines = self.list().await?;
        Ok(routines
            .into_iter()
            .filter(|r| r.creator_user_id == user_id)
            .collect())
    }

    /// Get a routine by ID.
    pub async fn get(&self, id: &str) -> Result<Routine> {
        let response = self
            .client
            .request(&path_for(&["api", "routines", id])?, RequestOptions::get())
            .await?;
        Client::handle_response(response, "could not load routine").await
    }

    /// Create an empty routine.
    pub async fn create(&self, name: &str) -> Result<Routine> {
        validation::routine_name(name)?;
        let body = RoutineName {
            name: name.trim().to_string(),
        };
        let response = self
            .client
            .request("/api/routines", RequestOptions::post().json(&body)?)
            .await?;
        Client::handle_response(response, "could not create routine").await
    }

    /// Rename a routine.
    pub async fn rename(&self, id: &str, name: &str) -> Result<Routine> {
        validation::routine_name(name)?;
        let body = RoutineName {
            name: name.trim().to_string(),
        };
        let response = self
            .client
            .request(
                &path_for(&["api", "routines", id])?,
                RequestOptions::put().json(&body)?,
            )
            .await?;
        Client::handle_response(response, "could not update routine").await
    }

    /// Delete a routine.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .request(&path_for(&["api", "routines", id])?, RequestOptions::delete())
            .await?;
        Client::handle_empty(response, "could not delete routine").await
    }

    /// Append an exercise slot to a routine.
    pub async fn add_exercise(&self, routine_id: &str, item: &RoutineExercise) -> Result<()> {
        validation::routine_exercise(item)?;
        let response = self
            .client
            .request(
                &path_for(&["api", "routines", routine_id, "exercises"])?,
                RequestOptions::post().json(item)?,
            )
            .await?;
        Client::handle_empty(response, "could not add exercise to routine").await
    }

    /// Change the load of one exercise slot.
    pub async fn update_exercise(
        &self,
        routine_id: &str,
        exercise_id: &str,
        update: &RoutineExerciseUpdate,
    ) -> Result<()> {
        validation::routine_exercise_update(update)?;
        let response = self
            .client
            .request(
                &path_for(&["api", "routines", routine_id, "exercises", exercise_id])?,
                RequestOptions::put().json(update)?,
            )
            .await?;
        Client::handle_empty(response, "could not update exercise in routine").await
    }

    /// Remove an exercise slot from a routine.
    pub async fn remove_exercise(&self, routine_id: &str, exercise_id: &str) -> Result<()> {
        if routine_id.trim().is_empty() || exercise_id.trim().is_empty() {
            return Err(Error::Validation(
                "routine id and exercise id are required".to_string(),
            ));
        }
        let body = RoutineExerciseRef {
            exercise_id: exercise_id.to_string(),
            routine_id: routine_id.to_string(),
        };
        let response = self
            .client
            .request(
                "/api/routines/exercises",
                RequestOptions::delete().json(&body)?,
            )
            .await?;
        Client::handle_empty(response, "could not remove exercise from routine").await
    }
}
