//! Handlers for user endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/login` | Body: `{"nickname":"..."}`; 404 if unknown |
//! | `POST` | `/users` | Body: [`RegisterBody`]; returns 201 + user |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/users/:id/ledger` | Score-log entries, newest first |
//! | `GET`  | `/ranking/:role` | Per-role ranking by score |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gumshoe_core::{
  Classify,
  ledger::ScoreEntry,
  projection::RankingRow,
  store::GameStore,
  user::{User, UserRole},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub nickname: String,
}

/// `POST /login` — identity lookup, not authentication.
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<User>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let user = store
    .user_by_nickname(body.nickname.clone())
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no user with nickname {:?}", body.nickname))
    })?;
  Ok(Json(user))
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub nickname: String,
  pub role:     UserRole,
}

/// `POST /users` — returns 201 + the stored user (score 0).
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let user = store
    .register_user(body.nickname, body.role)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

// ─── Ledger ───────────────────────────────────────────────────────────────────

/// `GET /users/:id/ledger` — the audit trail behind the cached score.
pub async fn ledger<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ScoreEntry>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let entries = store.score_log(id).await.map_err(ApiError::from_store)?;
  Ok(Json(entries))
}

// ─── Ranking ──────────────────────────────────────────────────────────────────

/// `GET /ranking/:role`
pub async fn ranking<S>(
  State(store): State<Arc<S>>,
  Path(role): Path<UserRole>,
) -> Result<Json<Vec<RankingRow>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let rows = store.ranking(role).await.map_err(ApiError::from_store)?;
  Ok(Json(rows))
}
