//! Routine detail view: one routine plus the details of each exercise in it.

use futures::future::join_all;
use tracing::{error, warn};

use crate::client::{Client, RequestOptions, path_for};
use crate::error::{Error, Result};
use crate::types::{Exercise, RoutineExercise};

/// Label shown for an exercise the server could not find.
pub const EXERCISE_NOT_FOUND_LABEL: &str = "Exercise not found";
/// Label shown for an exercise whose request failed.
pub const EXERCISE_FAILED_LABEL: &str = "Failed to load exercise";

/// Outcome of loading one exercise's details.
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseDetail {
    Loaded(Exercise),
    /// The server answered with a non-success status.
    NotFound,
    /// The request or decoding failed.
    Failed(String),
}

/// One slot of the routine, joined with its exercise details.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineViewEntry {
    pub slot: RoutineExercise,
    pub detail: ExerciseDetail,
}

impl RoutineViewEntry {
    /// Exercise name, or the fallback label when it could not be loaded.
    pub fn label(&self) -> &str {
        match &self.detail {
            ExerciseDetail::Loaded(exercise) => &exercise.name,
            ExerciseDetail::NotFound => EXERCISE_NOT_FOUND_LABEL,
            ExerciseDetail::Failed(_) => EXERCISE_FAILED_LABEL,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.detail, ExerciseDetail::Loaded(_))
    }
}

/// A routine with every exercise slot resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineView {
    pub routine_id: String,
    pub name: String,
    /// Empty when the routine has no exercises yet.
    pub entries: Vec<RoutineViewEntry>,
}

impl RoutineView {
    /// Load the routine, then fetch every exercise concurrently.
    ///
    /// A failure loading the routine itself is an error. Failures loading an
    /// individual exercise degrade that entry to a fallback label; the
    /// entries keep the routine's order.
    pub async fn load(client: &Client, routine_id: &str) -> Result<Self> {
        if routine_id.trim().is_empty() {
            return Err(Error::Validation("no routine selected".to_string()));
        }
        let routine = client.routines().get(routine_id).await?;

        let details = join_all(
            routine
                .exercises
                .iter()
                .map(|slot| load_detail(client, &slot.exercise_id)),
        )
        .await;

        let entries = routine
            .exercises
            .into_iter()
            .zip(details)
            .map(|(slot, detail)| RoutineViewEntry { slot, detail })
            .collect();

        Ok(Self {
            routine_id: routine_id.to_string(),
            name: routine.name,
            entries,
        })
    }

    /// Number of entries that fell back to a label.
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_loaded()).count()
    }
}

async fn load_detail(client: &Client, exercise_id: &str) -> ExerciseDetail {
    let path = match path_for(&["api", "exercises", exercise_id]) {
        Ok(path) => path,
        Err(e) => {
            warn!(name: "routine_view.item_invalid", exercise_id, error = %e, "Exercise id unusable");
            return ExerciseDetail::Failed(e.to_string());
        }
    };
    let response = match client.request(&path, RequestOptions::get()).await {
        Ok(response) => response,
        Err(e) => {
            error!(name: "routine_view.item_failed", exercise_id, error = %e, "Exercise request failed");
            return ExerciseDetail::Failed(e.to_string());
        }
    };

    if !response.status().is_success() {
        warn!(
            name: "routine_view.item_missing",
            exercise_id,
            status = response.status().as_u16(),
            "Exercise could not be loaded"
        );
        return ExerciseDetail::NotFound;
    }

    match Client::handle_response::<Exercise>(response, "could not load exercise").await {
        Ok(exercise) => ExerciseDetail::Loaded(exercise),
        Err(e) => {
            error!(name: "routine_view.item_failed", exercise_id, error = %e, "Exercise body unreadable");
            ExerciseDetail::Failed(e.to_string())
        }
    }
}
