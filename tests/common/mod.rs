//! In-process mock of the fitness backend, served on an ephemeral port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use fitness_client::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use fitness_client::{Client, MemorySessionStore, RecordingNavigator, SessionStore};

pub const PASSWORD: &str = "secret12";
pub const ACCESS_TOKEN: &str = "tok-1";
pub const REFRESHED_TOKEN: &str = "tok-2";
pub const REFRESH_TOKEN: &str = "ref-1";

/// What the mock saw, for assertions.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    authorization: Arc<Mutex<Vec<Option<String>>>>,
    revoked: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    /// `Authorization` header of every protected request, in order.
    pub fn authorization(&self) -> Vec<Option<String>> {
        self.authorization.lock().unwrap().clone()
    }

    /// Refresh tokens revoked via `POST /logout`.
    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct MockBackend {
    pub base_url: String,
    pub recorded: Recorded,
}

/// Start the mock on `127.0.0.1:0` and return its base URL.
pub async fn spawn_backend() -> MockBackend {
    let recorded = Recorded::default();
    let app = router(recorded.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockBackend {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

/// A base URL nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Client wired to a fresh memory store and a recording navigator.
pub fn client(base_url: &str) -> (Client, MemorySessionStore, RecordingNavigator) {
    let store = MemorySessionStore::new();
    let nav = RecordingNavigator::new();
    let client = Client::builder(base_url)
        .store(Arc::new(store.clone()))
        .navigator(Arc::new(nav.clone()))
        .build()
        .unwrap();
    (client, store, nav)
}

pub fn test_user() -> Value {
    json!({
        "ID": "u1",
        "UserName": "anagomez",
        "Email": "ana@example.com",
        "role": "client"
    })
}

/// Seed the store as if a login had happened with `token`.
pub fn seed_session(store: &MemorySessionStore, token: &str) {
    store.set(ACCESS_TOKEN_KEY, token).unwrap();
    store.set(REFRESH_TOKEN_KEY, REFRESH_TOKEN).unwrap();
    store.set(USER_KEY, &test_user().to_string()).unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// Routes
// ─────────────────────────────────────────────────────────────────────────────

fn router(recorded: Recorded) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/api/echo", get(echo))
        .route("/api/boom", get(boom))
        .route("/api/routines", get(list_routines))
        .route("/api/routines/{id}", get(get_routine))
        .route("/api/exercises/{id}", get(get_exercise))
        .route("/api/workouts", get(list_workouts))
        .route("/api/workouts/stats", get(workout_stats))
        .route("/api/users/{id}", axum::routing::put(update_user))
        .route("/api/users/{id}/password", post(change_password))
        .with_state(recorded)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Record the header and check it carries a live token.
fn authorized(recorded: &Recorded, headers: &HeaderMap) -> bool {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorded.authorization.lock().unwrap().push(auth.clone());
    auth.as_deref()
        .and_then(|a| a.strip_prefix("Bearer "))
        .is_some_and(|t| t == ACCESS_TOKEN || t == REFRESHED_TOKEN)
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "invalid credentials");
    }
    Json(json!({
        "access_token": ACCESS_TOKEN,
        "refresh_token": REFRESH_TOKEN,
        "user": test_user(),
    }))
    .into_response()
}

async fn refresh(Json(body): Json<Value>) -> Response {
    if body["refresh_token"] != REFRESH_TOKEN {
        return error(StatusCode::UNAUTHORIZED, "invalid refresh token");
    }
    Json(json!({ "access_token": REFRESHED_TOKEN })).into_response()
}

async fn logout(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    if let Some(token) = body["refresh_token"].as_str() {
        recorded.revoked.lock().unwrap().push(token.to_string());
    }
    Json(json!({ "message": "logged out" })).into_response()
}

async fn echo(State(recorded): State<Recorded>, headers: HeaderMap) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "authorization": header("authorization"),
        "content_type": header("content-type"),
        "x_trace": header("x-trace"),
    }))
    .into_response()
}

async fn boom(State(recorded): State<Recorded>, headers: HeaderMap) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    error(StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn list_routines(State(recorded): State<Recorded>, headers: HeaderMap) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    Json(json!([
        { "ID": "r1", "Name": "Legs", "CreatorUserID": "u1", "ExcerciseList": null },
        { "ID": "r2", "Name": "Someone else's", "CreatorUserID": "u2", "ExcerciseList": [] },
    ]))
    .into_response()
}

fn slot(exercise_id: &str) -> Value {
    json!({ "exercise_id": exercise_id, "repetitions": 10, "series": 3, "weight": 20.0 })
}

async fn get_routine(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    match id.as_str() {
        "r5" => Json(json!({
            "ID": "r5",
            "Name": "Full body",
            "CreatorUserID": "u1",
            "ExcerciseList": (["e1", "e2", "e3", "e4", "e5"].map(slot)),
        }))
        .into_response(),
        "r-empty" => Json(json!({
            "ID": "r-empty",
            "Name": "Fresh",
            "CreatorUserID": "u1",
            "ExcerciseList": null,
        }))
        .into_response(),
        _ => error(StatusCode::NOT_FOUND, "routine not found"),
    }
}

async fn get_exercise(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    match id.as_str() {
        "e2" => error(StatusCode::NOT_FOUND, "exercise not found"),
        // 200 with a body that is not JSON
        "e4" => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => Json(json!({ "id": id, "Name": format!("Exercise {id}"), "Category": "strength" }))
            .into_response(),
    }
}

async fn list_workouts(State(recorded): State<Recorded>, headers: HeaderMap) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    // The backend reports an empty history as not found
    error(StatusCode::NOT_FOUND, "no se encontraron workouts para el usuario")
}

async fn workout_stats(State(recorded): State<Recorded>, headers: HeaderMap) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn update_user(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    Json(json!({
        "UserName": body["user_name"],
        "Email": body["email"],
        "Role": "client",
        "Weight": body["weight"],
        "Height": body["height"],
        "Experience": body["experience"],
        "Objetive": body["objetive"],
    }))
    .into_response()
}

async fn change_password(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&recorded, &headers) {
        return error(StatusCode::UNAUTHORIZED, "invalid token");
    }
    if body["current_password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "current password is incorrect");
    }
    Json(json!({ "mensaje": "password updated successfully" })).into_response()
}
