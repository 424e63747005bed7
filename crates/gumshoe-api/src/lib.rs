//! JSON REST API for Gumshoe.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gumshoe_core::store::GameStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gumshoe_api::api_router(store.clone()))
//! ```

pub mod cases;
pub mod error;
pub mod users;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use gumshoe_core::{Classify, store::GameStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GameStore + Clone + Send + Sync + 'static,
  S::Error: Classify + Send + Sync + 'static,
{
  Router::new()
    // Users
    .route("/login", post(users::login::<S>))
    .route("/users", post(users::register::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .route("/users/{id}/ledger", get(users::ledger::<S>))
    .route("/ranking/{role}", get(users::ranking::<S>))
    // Case seeding and per-case reads
    .route("/cases", post(cases::create::<S>))
    .route("/cases/available", get(cases::available::<S>))
    .route("/cases/{id}", get(cases::details::<S>))
    .route(
      "/cases/{id}/evidence",
      get(cases::evidence_pool::<S>).post(cases::seed_evidence::<S>),
    )
    .route("/cases/{id}/suspects", post(cases::seed_suspect::<S>))
    .route("/cases/{id}/submitted", get(cases::submitted::<S>))
    .route("/cases/{id}/culprit", get(cases::culprit_name::<S>))
    // Workflow operations
    .route("/cases/{id}/request", post(cases::request::<S>))
    .route("/cases/{id}/join", post(cases::join::<S>))
    .route("/cases/{id}/fabricate", post(cases::fabricate::<S>))
    .route("/cases/{id}/accept", post(cases::accept::<S>))
    .route("/cases/{id}/assign", post(cases::assign::<S>))
    .route("/cases/{id}/guess", post(cases::guess::<S>))
    // Role-filtered listings
    .route("/cases/culprit/open", get(views::culprit_open::<S>))
    .route("/cases/culprit/{user_id}", get(views::culprit_cases::<S>))
    .route("/cases/client/{user_id}", get(views::client_cases::<S>))
    .route(
      "/cases/police/pending/{user_id}",
      get(views::police_pending::<S>),
    )
    .route("/cases/police/{user_id}", get(views::police_cases::<S>))
    .route(
      "/cases/detective/{user_id}",
      get(views::detective_assigned::<S>),
    )
    .route(
      "/cases/detective/completed/{user_id}",
      get(views::detective_completed::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use gumshoe_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router<()>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn register(app: &Router<()>, nickname: &str, role: &str) -> String {
    let (status, user) = send(
      app,
      "POST",
      "/users",
      Some(json!({ "nickname": nickname, "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    user["user_id"].as_str().unwrap().to_owned()
  }

  // ── Users ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_then_login() {
    let app = app().await;
    let id = register(&app, "Holmes", "detective").await;

    let (status, user) =
      send(&app, "POST", "/login", Some(json!({ "nickname": "Holmes" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["user_id"], Value::String(id));
    assert_eq!(user["score"], 0);
  }

  #[tokio::test]
  async fn login_unknown_nickname_is_404() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/login", Some(json!({ "nickname": "nobody" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn duplicate_nickname_is_409() {
    let app = app().await;
    register(&app, "Holmes", "detective").await;

    let (status, _) = send(
      &app,
      "POST",
      "/users",
      Some(json!({ "nickname": "Holmes", "role": "police" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  // ── Cases ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn bad_difficulty_is_400() {
    let app = app().await;
    let (status, _) = send(
      &app,
      "POST",
      "/cases",
      Some(json!({ "title": "t", "body": "b", "difficulty": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn missing_case_is_404() {
    let app = app().await;
    let (status, _) = send(
      &app,
      "GET",
      "/cases/00000000-0000-0000-0000-000000000000",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Full workflow over HTTP ─────────────────────────────────────────────────

  #[tokio::test]
  async fn full_game_over_http() {
    let app = app().await;
    let client = register(&app, "Adler", "client").await;
    let culprit = register(&app, "Moriarty", "culprit").await;
    let police = register(&app, "Lestrade", "police").await;
    let detective = register(&app, "Holmes", "detective").await;

    let (status, case) = send(
      &app,
      "POST",
      "/cases",
      Some(json!({
        "title": "The Missing Emerald",
        "body": "A jewel vanished from a locked study.",
        "difficulty": 3,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(case["status"], "registered");
    let case_id = case["case_id"].as_str().unwrap().to_owned();

    for (description, is_true, candidate) in [
      ("the study door was locked from inside", true, false),
      ("It was {name} in the study", false, true),
    ] {
      let (status, _) = send(
        &app,
        "POST",
        &format!("/cases/{case_id}/evidence"),
        Some(json!({
          "description": description,
          "is_true": is_true,
          "is_fake_candidate": candidate,
        })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/suspects"),
      Some(json!({ "name": "the butler" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/request"),
      Some(json!({ "client_id": client })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/join"),
      Some(json!({ "culprit_id": culprit })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, case) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/fabricate"),
      Some(json!({
        "culprit_id": culprit,
        "fake_description": "It was {name} in the study",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(case["status"], "fabricated");

    // The materialised fake carries the culprit's nickname.
    let (_, submitted) =
      send(&app, "GET", &format!("/cases/{case_id}/submitted"), None).await;
    let fakes: Vec<_> = submitted
      .as_array()
      .unwrap()
      .iter()
      .filter(|e| e["is_true"] == false)
      .collect();
    assert_eq!(fakes.len(), 1);
    assert_eq!(fakes[0]["description"], "It was Moriarty in the study");

    let (status, case) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/accept"),
      Some(json!({ "police_id": police })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(case["status"], "accepting");

    let (status, case) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/assign"),
      Some(json!({ "police_id": police, "detective_id": detective })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(case["status"], "assigned");

    let (status, outcome) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/guess"),
      Some(json!({
        "detective_id": detective,
        "culprit_nickname": "Moriarty",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["is_solved"], true);
    assert_eq!(outcome["detective_score_change"], 30);
    assert_eq!(outcome["culprit_score_change"], 0);
    assert_eq!(outcome["new_status"], "result_checked");

    // Guessing again is a workflow conflict.
    let (status, _) = send(
      &app,
      "POST",
      &format!("/cases/{case_id}/guess"),
      Some(json!({
        "detective_id": detective,
        "culprit_nickname": "Moriarty",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Ledger and ranking reflect the settlement.
    let (_, entries) =
      send(&app, "GET", &format!("/users/{detective}/ledger"), None).await;
    let sum: i64 = entries
      .as_array()
      .unwrap()
      .iter()
      .map(|e| e["delta"].as_i64().unwrap())
      .sum();
    assert_eq!(sum, 31);

    let (status, rows) = send(&app, "GET", "/ranking/detective", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["nickname"], "Holmes");
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["score"], 31);
  }
}
