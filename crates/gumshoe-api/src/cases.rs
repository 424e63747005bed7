//! Handlers for case seeding, workflow operations, and per-case reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/cases` | Body: [`NewCase`]; returns 201 + registered case |
//! | `GET`  | `/cases/available` | Cases open for a client request |
//! | `GET`  | `/cases/:id` | Case plus suspects; 404 if missing |
//! | `POST` | `/cases/:id/evidence` | Seed one pool statement |
//! | `GET`  | `/cases/:id/evidence` | The full pool, for fabrication |
//! | `POST` | `/cases/:id/suspects` | Seed one suspect name |
//! | `POST` | `/cases/:id/request` | Client opens the case |
//! | `POST` | `/cases/:id/join` | Culprit claims the case |
//! | `POST` | `/cases/:id/fabricate` | Culprit submits their fake |
//! | `POST` | `/cases/:id/accept` | Police accepts |
//! | `POST` | `/cases/:id/assign` | Police + detective assigned together |
//! | `POST` | `/cases/:id/guess` | Detective accuses; scores settle |
//! | `GET`  | `/cases/:id/submitted` | The materialised evidence set |
//! | `GET`  | `/cases/:id/culprit` | Joined culprit's nickname |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gumshoe_core::{
  Classify,
  case::{Case, CaseStatus, NewCase},
  evidence::{NewEvidence, OriginalEvidence, SubmittedEvidence, Suspect},
  participation::Participation,
  projection::{CaseDetails, FabricationDetails},
  store::GameStore,
  workflow::GuessOutcome,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// `POST /cases` — returns 201 + the case in `registered` status.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCase>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let case = store.create_case(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(case)))
}

/// JSON body accepted by `POST /cases/:id/evidence`.
#[derive(Debug, Deserialize)]
pub struct EvidenceBody {
  pub description:       String,
  pub is_true:           bool,
  #[serde(default)]
  pub is_fake_candidate: bool,
}

/// `POST /cases/:id/evidence`
pub async fn seed_evidence<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<EvidenceBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let statement: OriginalEvidence = store
    .add_original_evidence(NewEvidence {
      case_id,
      description:       body.description,
      is_true:           body.is_true,
      is_fake_candidate: body.is_fake_candidate,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(statement)))
}

#[derive(Debug, Deserialize)]
pub struct SuspectBody {
  pub name: String,
}

/// `POST /cases/:id/suspects`
pub async fn seed_suspect<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<SuspectBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let suspect: Suspect = store
    .add_suspect(case_id, body.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(suspect)))
}

// ─── Per-case reads ───────────────────────────────────────────────────────────

/// `GET /cases/available`
pub async fn available<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Case>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let cases = store
    .list_cases_by_status(CaseStatus::Registered)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(cases))
}

/// `GET /cases/:id`
pub async fn details<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
) -> Result<Json<CaseDetails>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let details = store
    .case_details(case_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {case_id} not found")))?;
  Ok(Json(details))
}

/// `GET /cases/:id/evidence` — the pool a culprit fabricates from.
pub async fn evidence_pool<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
) -> Result<Json<FabricationDetails>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let details = store
    .fabrication_details(case_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {case_id} not found")))?;
  Ok(Json(details))
}

/// `GET /cases/:id/submitted`
pub async fn submitted<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
) -> Result<Json<Vec<SubmittedEvidence>>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let rows = store
    .submitted_evidence(case_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rows))
}

/// `GET /cases/:id/culprit` — `{"nickname": "..."}`, with the `"unknown"`
/// sentinel when no culprit has joined.
pub async fn culprit_name<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let nickname = store
    .culprit_nickname(case_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(json!({ "nickname": nickname })))
}

// ─── Workflow operations ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RequestBody {
  pub client_id: Uuid,
}

/// `POST /cases/:id/request`
pub async fn request<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<RequestBody>,
) -> Result<Json<Participation>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let participation = store
    .open_case(case_id, body.client_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(participation))
}

#[derive(Debug, Deserialize)]
pub struct JoinBody {
  pub culprit_id: Uuid,
}

/// `POST /cases/:id/join`
pub async fn join<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<JoinBody>,
) -> Result<Json<Participation>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let participation = store
    .join_culprit(case_id, body.culprit_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(participation))
}

#[derive(Debug, Deserialize)]
pub struct FabricateBody {
  pub culprit_id:       Uuid,
  pub fake_description: String,
}

/// `POST /cases/:id/fabricate`
pub async fn fabricate<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<FabricateBody>,
) -> Result<Json<Case>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let case = store
    .fabricate(case_id, body.culprit_id, body.fake_description)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(case))
}

#[derive(Debug, Deserialize)]
pub struct AcceptBody {
  pub police_id: Uuid,
}

/// `POST /cases/:id/accept`
pub async fn accept<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<AcceptBody>,
) -> Result<Json<Case>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let case = store
    .police_accept(case_id, body.police_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(case))
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub police_id:    Uuid,
  pub detective_id: Uuid,
}

/// `POST /cases/:id/assign`
pub async fn assign<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<Json<Case>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let case = store
    .police_assign(case_id, body.police_id, body.detective_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(case))
}

#[derive(Debug, Deserialize)]
pub struct GuessBody {
  pub detective_id:     Uuid,
  pub culprit_nickname: String,
}

/// `POST /cases/:id/guess`
pub async fn guess<S>(
  State(store): State<Arc<S>>,
  Path(case_id): Path<Uuid>,
  Json(body): Json<GuessBody>,
) -> Result<Json<GuessOutcome>, ApiError>
where
  S: GameStore,
  S::Error: Classify + Send + Sync + 'static,
{
  let outcome = store
    .detective_guess(case_id, body.detective_id, body.culprit_nickname)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}
