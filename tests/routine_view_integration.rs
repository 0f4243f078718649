mod common;

use common::{ACCESS_TOKEN, client, seed_session, spawn_backend};
use fitness_client::Error;
use fitness_client::views::{
    EXERCISE_FAILED_LABEL, EXERCISE_NOT_FOUND_LABEL, ExerciseDetail, RoutineView,
};

#[tokio::test]
async fn test_partial_failures_degrade_to_labels() {
    let backend = spawn_backend().await;
    let (client, store, nav) = client(&backend.base_url);
    seed_session(&store, ACCESS_TOKEN);

    let view = RoutineView::load(&client, "r5").await.unwrap();

    assert_eq!(view.name, "Full body");
    assert_eq!(view.entries.len(), 5);
    assert_eq!(view.failed_count(), 2);

    let labels: Vec<&str> = view.entries.iter().map(|e| e.label()).collect();
    assert_eq!(
        labels,
        vec![
            "Exercise e1",
            EXERCISE_NOT_FOUND_LABEL,
            "Exercise e3",
            EXERCISE_FAILED_LABEL,
            "Exercise e5",
        ]
    );
    assert!(matches!(view.entries[1].detail, ExerciseDetail::NotFound));
    assert!(matches!(view.entries[3].detail, ExerciseDetail::Failed(_)));
    assert_eq!(view.entries[4].slot.exercise_id, "e5");
    assert!(nav.events().is_empty());
}

#[tokio::test]
async fn test_routine_without_exercises() {
    let backend = spawn_backend().await;
    let (client, store, _nav) = client(&backend.base_url);
    seed_session(&store, ACCESS_TOKEN);

    let view = RoutineView::load(&client, "r-empty").await.unwrap();

    assert_eq!(view.name, "Fresh");
    assert!(view.entries.is_empty());
    assert_eq!(view.failed_count(), 0);
}

#[tokio::test]
async fn test_missing_routine_is_an_error() {
    let backend = spawn_backend().await;
    let (client, store, _nav) = client(&backend.base_url);
    seed_session(&store, ACCESS_TOKEN);

    let err = RoutineView::load(&client, "nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_blank_routine_id_is_rejected_before_dispatch() {
    let backend = spawn_backend().await;
    let (client, store, _nav) = client(&backend.base_url);
    seed_session(&store, ACCESS_TOKEN);

    let err = RoutineView::load(&client, "  ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(backend.recorded.authorization().is_empty());
}

#[tokio::test]
async fn test_expired_token_fails_the_whole_view() {
    let backend = spawn_backend().await;
    let (client, store, nav) = client(&backend.base_url);
    seed_session(&store, "expired-token");

    let err = RoutineView::load(&client, "r5").await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert_eq!(nav.notices().len(), 1);
}
