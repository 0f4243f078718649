//! Dashboard aggregates computed client-side.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::types::{TopExercise, UserProfile};

/// Age bracket labels, in display order.
pub const AGE_GROUP_LABELS: [&str; 6] = ["<20", "20-29", "30-39", "40-49", "50+", "N/A"];

/// Number of users in one age bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroup {
    pub label: &'static str,
    pub count: usize,
}

/// Whole years between `birth` and `today`, or `None` when the birth date
/// is in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

fn bracket(age: Option<u32>) -> usize {
    match age {
        Some(0..=19) => 0,
        Some(20..=29) => 1,
        Some(30..=39) => 2,
        Some(40..=49) => 3,
        Some(_) => 4,
        None => 5,
    }
}

/// Bucket users by age on `today`.
///
/// Users without a birth date, with the "unset" zero date the backend uses
/// (year 1), or with a birth date after `today` land in `N/A`.
pub fn age_groups(users: &[UserProfile], today: NaiveDate) -> Vec<AgeGroup> {
    let mut counts = [0usize; AGE_GROUP_LABELS.len()];
    for user in users {
        let age = user
            .birth_date
            .map(|d| d.date_naive())
            .filter(|d| d.year() > 1)
            .and_then(|d| age_on(d, today));
        counts[bracket(age)] += 1;
    }
    AGE_GROUP_LABELS
        .into_iter()
        .zip(counts)
        .map(|(label, count)| AgeGroup { label, count })
        .collect()
}

/// The first `n` entries of a ranking that is already ordered by the server.
pub fn top_exercises(ranking: &[TopExercise], n: usize) -> &[TopExercise] {
    &ranking[..ranking.len().min(n)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn born(y: i32, m: u32, d: u32) -> UserProfile {
        UserProfile {
            birth_date: Some(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_age_respects_birthday() {
        let today = date(2024, 6, 15);
        assert_eq!(age_on(date(2000, 6, 15), today), Some(24));
        assert_eq!(age_on(date(2000, 6, 16), today), Some(23));
        assert_eq!(age_on(date(2030, 1, 1), today), None);
    }

    #[test]
    fn test_age_groups() {
        let today = date(2024, 6, 15);
        let users = vec![
            born(2010, 1, 1),
            born(2000, 1, 1),
            born(1995, 1, 1),
            born(1980, 1, 1),
            born(1960, 1, 1),
            born(1, 1, 1),
            UserProfile::default(),
        ];
        let groups = age_groups(&users, today);
        let counts: Vec<usize> = groups.iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![1, 2, 0, 1, 1, 2]);
        assert_eq!(groups[5].label, "N/A");
    }

    #[test]
    fn test_top_exercises_truncates() {
        let ranking: Vec<TopExercise> = (0..5)
            .map(|i| TopExercise {
                exercise_id: format!("e{i}"),
                exercise_name: format!("Exercise {i}"),
                count: 10 - i,
            })
            .collect();
        assert_eq!(top_exercises(&ranking, 3).len(), 3);
        assert_eq!(top_exercises(&ranking, 3)[0].exercise_id, "e0");
        assert_eq!(top_exercises(&ranking[..2], 3).len(), 2);
    }
}
