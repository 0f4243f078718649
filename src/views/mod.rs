//! Page logic built on top of the client.
//!
//! - [`RoutineView`]: routine detail with concurrent per-exercise fan-out
//! - [`stats`]: age brackets and exercise ranking for the admin dashboard

mod routine;
pub mod stats;

pub use routine::{
    EXERCISE_FAILED_LABEL, EXERCISE_NOT_FOUND_LABEL, ExerciseDetail, RoutineView,
    RoutineViewEntry,
};
