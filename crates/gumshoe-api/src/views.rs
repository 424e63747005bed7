//! Handlers for the role-filtered listings.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/cases/culprit/open` | Registered cases with no culprit yet |
//! | `GET` | `/cases/culprit/:user_id` | Cases this culprit has joined |
//! | `GET` | `/cases/client/:user_id` | Cases this client requested |
//! | `GET` | `/cases/police/pending/:user_id` | Unclaimed-or-mine pending cases |
//! | `GET` | `/cases/police/:user_id` | Every case this officer holds |
//! | `GET` | `/cases/detective/:user_id` | Cases awaiting this detective's guess |
//! | `GET` | `/cases/detective/completed/:user_id` | Settled cases with outcomes |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use gumshoe_core::{
  Classify,
  case::CaseStatus,
  projection::{
    AvailableCaseView, ClientCaseView, CulpritCaseView, DetectiveCaseView,
    PoliceCaseView,
  },
  store::GameStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /cases/culprit/open`
pub async fn culprit_open<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<AvailableCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .culprit_open_cases()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

/// `GET /cases/culprit/:user_id`
pub async fn culprit_cases<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<CulpritCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .culprit_cases(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

/// `GET /cases/client/:user_id`
pub async fn client_cases<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ClientCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .client_cases(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

/// `GET /cases/police/pending/:user_id`
pub async fn police_pending<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PoliceCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .pending_cases_for_police(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

/// `GET /cases/police/:user_id`
pub async fn police_cases<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PoliceCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .police_cases(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

/// `GET /cases/detective/:user_id` — cases in `assigned` status.
pub async fn detective_assigned<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<DetectiveCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .detective_cases(user_id, CaseStatus::Assigned)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}

/// `GET /cases/detective/completed/:user_id` — settled cases.
pub async fn detective_completed<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<DetectiveCaseView>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let views = store
    .detective_cases(user_id, CaseStatus::ResultChecked)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(views))
}
