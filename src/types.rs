//! Request and response types for the fitness backend.
//!
//! These mirror the backend DTOs. Request bodies use snake_case JSON tags;
//! most response DTOs carry no tags on the server and therefore arrive in
//! PascalCase.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::UserRecord;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Enumerations
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Client,
}

/// Training experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

/// Training objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    LoseWeight,
    GainWeight,
    Maintain,
}

/// Exercise category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Strength,
    Cardio,
    Flexibility,
    Balance,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Flexibility => "flexibility",
            Self::Balance => "balance",
        }
    }
}

// =============================================================================
// Auth Types
// =============================================================================

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub user: UserRecord,
}

/// Body of `POST /refresh` and `POST /logout`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response from `POST /refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub birth_date: DateTime<Utc>,
    pub weight: f32,
    pub height: f32,
    pub experience: Experience,
    pub objetive: Objective,
    pub role: Role,
}

/// Error payload used by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

// =============================================================================
// Exercise Types
// =============================================================================

/// An exercise from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Exercise {
    #[serde(rename = "id", alias = "ID", default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "CreatorUserID", default)]
    pub creator_user_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub main_muscle_group: String,
    #[serde(default)]
    pub difficult_level: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub edition_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub elimination_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Body of `POST /api/exercises` and `PUT /api/exercises/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseInput {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub main_muscle_group: String,
    pub difficult_level: String,
    /// Demonstration video URL.
    pub example: String,
    pub instructions: String,
}

/// Query of `GET /api/exercises/filter`. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub muscle_group: Option<String>,
}

impl ExerciseFilter {
    /// Query pairs with blank values dropped.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", self.name.as_deref()),
            ("category", self.category.as_deref()),
            ("muscle_group", self.muscle_group.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(str::trim).filter(|v| !v.is_empty()).map(|v| (k, v)))
        .collect()
    }
}

// =============================================================================
// Routine Types
// =============================================================================

/// One exercise slot inside a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub exercise_id: String,
    pub repetitions: u32,
    pub series: u32,
    #[serde(default)]
    pub weight: f64,
}

/// Body of `PUT /api/routines/:id/exercises/:exercise_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineExerciseUpdate {
    pub repetitions: u32,
    pub series: u32,
    pub weight: f64,
}

/// A training routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Routine {
    #[serde(rename = "ID", alias = "id", default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "CreatorUserID", default)]
    pub creator_user_id: String,
    #[serde(
        rename = "ExcerciseList",
        default,
        deserialize_with = "null_as_default"
    )]
    pub exercises: Vec<RoutineExercise>,
    #[serde(default)]
    pub edition_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub elimination_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Body of `POST /api/routines` and `PUT /api/routines/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct RoutineName {
    pub name: String,
}

/// Body of `DELETE /api/routines/exercises`.
#[derive(Debug, Clone, Serialize)]
pub struct RoutineExerciseRef {
    pub exercise_id: String,
    pub routine_id: String,
}

// =============================================================================
// Workout Types
// =============================================================================

/// A completed routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub routine_id: String,
    pub done_at: DateTime<Utc>,
}

/// Usage count of one routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoutineUsage {
    pub routine_name: String,
    pub count: u32,
}

/// Workouts done in one month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProgressPoint {
    pub date: String,
    pub count: u32,
}

/// Response from `GET /api/workouts/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WorkoutStats {
    pub total_workouts: u32,
    pub weekly_frequency: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub most_used_routines: Vec<RoutineUsage>,
    #[serde(deserialize_with = "null_as_default")]
    pub progress_over_time: Vec<ProgressPoint>,
}

// =============================================================================
// User Types
// =============================================================================

/// Response from `GET /api/users/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserProfile {
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub birth_date: Option<DateTime<Utc>>,
    pub weight: f32,
    pub height: f32,
    pub experience: String,
    pub objetive: String,
}

/// Body of `PUT /api/users/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub user_name: String,
    pub email: String,
    pub height: f32,
    pub weight: f32,
    pub experience: Experience,
    pub objetive: Objective,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Response from `PUT /api/users/:id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProfileUpdateResponse {
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub weight: f32,
    pub height: f32,
    pub experience: String,
    pub objetive: String,
}

/// Body of `POST /api/users/:id/password`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PasswordChangeResponse {
    pub mensaje: Option<String>,
}

// =============================================================================
// Admin Types
// =============================================================================

/// Response from `GET /api/admin/stats/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub users: Vec<UserProfile>,
}

/// One row of `GET /api/admin/stats/exercises`, most used first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopExercise {
    #[serde(rename = "ExcerciseID", default)]
    pub exercise_id: String,
    #[serde(rename = "ExcerciseName", default)]
    pub exercise_name: String,
    #[serde(rename = "Count", default)]
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_routine_accepts_null_exercise_list() {
        let routine: Routine = serde_json::from_value(json!({
            "ID": "r1",
            "Name": "Legs",
            "CreatorUserID": "u1",
            "ExcerciseList": null,
            "CreationDate": "0001-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(routine.exercises.is_empty());
        assert_eq!(routine.creator_user_id, "u1");
    }

    #[test]
    fn test_routine_exercise_list_uses_snake_case_items() {
        let routine: Routine = serde_json::from_value(json!({
            "Name": "Push",
            "ExcerciseList": [
                {"exercise_id": "e1", "repetitions": 10, "series": 3, "weight": 42.5}
            ]
        }))
        .unwrap();
        assert_eq!(routine.id, "");
        assert_eq!(routine.exercises[0].exercise_id, "e1");
        assert!((routine.exercises[0].weight - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filter_drops_blank_fields() {
        let filter = ExerciseFilter {
            name: Some("  squat ".into()),
            category: Some(String::new()),
            muscle_group: None,
        };
        assert_eq!(filter.query_pairs(), vec![("name", "squat")]);
    }

    #[test]
    fn test_register_request_wire_names() {
        let req = RegisterRequest {
            name: "Ana".into(),
            last_name: "Gomez".into(),
            user_name: "anagomez".into(),
            email: "ana@example.com".into(),
            password: "secret12".into(),
            birth_date: "1990-05-01T00:00:00Z".parse().unwrap(),
            weight: 60.0,
            height: 165.0,
            experience: Experience::Beginner,
            objetive: Objective::LoseWeight,
            role: Role::Client,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["objetive"], "lose_weight");
        assert_eq!(value["role"], "client");
        assert_eq!(value["birth_date"], "1990-05-01T00:00:00Z");
    }

    #[test]
    fn test_workout_stats_defaults() {
        let stats: WorkoutStats = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stats, WorkoutStats::default());

        let stats: WorkoutStats = serde_json::from_value(json!({
            "TotalWorkouts": 4,
            "WeeklyFrequency": 1.5,
            "MostUsedRoutines": [{"RoutineName": "Legs", "Count": 3}],
            "ProgressOverTime": null
        }))
        .unwrap();
        assert_eq!(stats.total_workouts, 4);
        assert_eq!(stats.most_used_routines[0].routine_name, "Legs");
        assert!(stats.progress_over_time.is_empty());
    }
}
