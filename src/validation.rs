//! Cheap input checks run before a request is dispatched.
//!
//! The backend validates everything again; these only catch what is
//! obviously wrong so a round trip is not wasted.

use crate::error::{Error, Result};
use crate::types::{
    ExerciseInput, PasswordChange, ProfileUpdate, RegisterRequest, RoutineExercise,
    RoutineExerciseUpdate,
};

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 7;
/// Minimum user name length accepted by the backend.
pub const MIN_USER_NAME_LEN: usize = 5;

const MAX_REPETITIONS: u32 = 100;
const MAX_SERIES: u32 = 20;
const MAX_WEIGHT: f64 = 1000.0;

fn fail<T>(message: impl Into<String>) -> Result<T> {
    Err(Error::Validation(message.into()))
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Every field present and a confirmed new password of at least [`MIN_PASSWORD_LEN`] characters.
pub fn password_change(change: &PasswordChange) -> Result<()> {
    if change.current_password.is_empty()
        || change.new_password.is_empty()
        || change.confirm_password.is_empty()
    {
        return fail("all password fields are required");
    }
    if change.new_password != change.confirm_password {
        return fail("new password and confirmation do not match");
    }
    if change.new_password.chars().count() < MIN_PASSWORD_LEN {
        return fail(format!(
            "new password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

/// User name and email present, weight and height positive.
pub fn profile_update(update: &ProfileUpdate) -> Result<()> {
    if update.user_name.trim().is_empty() || update.email.trim().is_empty() {
        return fail("user name and email are required");
    }
    if update.weight <= 0.0 || update.height <= 0.0 {
        return fail("weight and height must be positive");
    }
    Ok(())
}

/// Credentials long enough and well formed, and measurements not negative.
pub fn registration(req: &RegisterRequest) -> Result<()> {
    if req.user_name.trim().chars().count() < MIN_USER_NAME_LEN {
        return fail(format!(
            "user name must be at least {MIN_USER_NAME_LEN} characters"
        ));
    }
    if !looks_like_email(req.email.trim()) {
        return fail("email is not valid");
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return fail(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if req.weight < 0.0 || req.height < 0.0 {
        return fail("weight and height cannot be negative");
    }
    Ok(())
}

/// Email and password present.
pub fn login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return fail("email and password are required");
    }
    Ok(())
}

fn slot(repetitions: u32, series: u32, weight: f64) -> Result<()> {
    if !(1..=MAX_REPETITIONS).contains(&repetitions) {
        return fail(format!("repetitions must be between 1 and {MAX_REPETITIONS}"));
    }
    if !(1..=MAX_SERIES).contains(&series) {
        return fail(format!("series must be between 1 and {MAX_SERIES}"));
    }
    if !(0.0..=MAX_WEIGHT).contains(&weight) {
        return fail(format!("weight must be between 0 and {MAX_WEIGHT}"));
    }
    Ok(())
}

/// Exercise id present and the slot load within range.
pub fn routine_exercise(item: &RoutineExercise) -> Result<()> {
    if item.exercise_id.trim().is_empty() {
        return fail("exercise id is required");
    }
    slot(item.repetitions, item.series, item.weight)
}

/// Slot load within range.
pub fn routine_exercise_update(update: &RoutineExerciseUpdate) -> Result<()> {
    slot(update.repetitions, update.series, update.weight)
}

/// Routine name not blank.
pub fn routine_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return fail("routine name is required");
    }
    Ok(())
}

/// Every text field of the exercise filled in.
pub fn exercise_input(input: &ExerciseInput) -> Result<()> {
    let required = [
        ("name", &input.name),
        ("description", &input.description),
        ("main muscle group", &input.main_muscle_group),
        ("difficulty level", &input.difficult_level),
        ("example", &input.example),
        ("instructions", &input.instructions),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return fail(format!("{field} is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Experience, Objective};

    fn change(current: &str, new: &str, confirm: &str) -> PasswordChange {
        PasswordChange {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_password_change_rules() {
        assert!(password_change(&change("old", "longenough", "longenough")).is_ok());
        assert!(matches!(
            password_change(&change("", "longenough", "longenough")),
            Err(Error::Validation(_))
        ));
        assert!(password_change(&change("old", "longenough", "different")).is_err());
        assert!(password_change(&change("old", "short", "short")).is_err());
    }

    #[test]
    fn test_profile_update_rules() {
        let mut update = ProfileUpdate {
            user_name: "anagomez".into(),
            email: "ana@example.com".into(),
            height: 165.0,
            weight: 60.0,
            experience: Experience::Beginner,
            objetive: Objective::Maintain,
            role: None,
        };
        assert!(profile_update(&update).is_ok());

        update.weight = 0.0;
        assert!(profile_update(&update).is_err());

        update.weight = 60.0;
        update.email = "  ".into();
        assert!(profile_update(&update).is_err());
    }

    #[test]
    fn test_routine_slot_bounds() {
        let mut item = RoutineExercise {
            exercise_id: "e1".into(),
            repetitions: 100,
            series: 20,
            weight: 1000.0,
        };
        assert!(routine_exercise(&item).is_ok());

        item.repetitions = 0;
        assert!(routine_exercise(&item).is_err());

        item.repetitions = 10;
        item.series = 21;
        assert!(routine_exercise(&item).is_err());

        item.series = 3;
        item.weight = -1.0;
        assert!(routine_exercise(&item).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("ab.co"));
    }
}
