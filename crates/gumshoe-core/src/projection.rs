//! Read-only, role-filtered views over the workflow state.
//!
//! These never mutate anything. An unresolved user reference degrades to a
//! sentinel label rather than failing the whole listing: one dangling
//! foreign reference must not abort an entire view.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  case::{Case, CaseStatus},
  evidence::{OriginalEvidence, Suspect},
};

/// Label used when a referenced user cannot be resolved.
pub const UNKNOWN: &str = "unknown";

/// Label used when a role slot has simply not been filled yet.
pub const UNASSIGNED: &str = "unassigned";

/// Outcome label for a settled case, from the detective's perspective.
pub fn outcome_label(solved: bool) -> &'static str {
  if solved { "solved" } else { "unsolved" }
}

// ─── Role listings ───────────────────────────────────────────────────────────

/// A registered case a culprit can still join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableCaseView {
  pub participation_id: Uuid,
  pub case_id:          Uuid,
  pub title:            String,
  pub body:             String,
  pub difficulty:       u8,
  pub client_nickname:  String,
}

/// A case the culprit has joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CulpritCaseView {
  pub participation_id: Uuid,
  pub case_id:          Uuid,
  pub title:            String,
  pub body:             String,
  pub difficulty:       u8,
  pub client_nickname:  String,
  pub status:           CaseStatus,
  /// Whether the culprit has already submitted fabricated evidence.
  pub fake_selected:    bool,
}

/// A case as seen by the client who requested it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCaseView {
  pub participation_id:   Uuid,
  pub case_id:            Uuid,
  pub title:              String,
  pub body:               String,
  pub difficulty:         u8,
  pub detective_nickname: String,
  pub status:             CaseStatus,
  /// `"solved"` / `"unsolved"` once the case is result-checked.
  pub outcome:            Option<String>,
}

/// A case on a police officer's desk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliceCaseView {
  pub participation_id: Uuid,
  pub case_id:          Uuid,
  pub title:            String,
  pub body:             String,
  pub difficulty:       u8,
  pub status:           CaseStatus,
  pub client_nickname:  String,
  pub culprit_nickname: String,
}

/// A case assigned to (or completed by) a detective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectiveCaseView {
  pub participation_id: Uuid,
  pub case_id:          Uuid,
  pub title:            String,
  pub body:             String,
  pub difficulty:       u8,
  pub client_nickname:  String,
  pub police_nickname:  String,
  pub status:           CaseStatus,
  pub suspects:         Vec<String>,
  /// Nickname of the accused; `None` until the detective has guessed.
  pub guess_nickname:   Option<String>,
  /// `"solved"` / `"unsolved"` once settled.
  pub outcome:          Option<String>,
  /// Nickname of the true culprit, revealed after settlement.
  pub actual_culprit:   Option<String>,
}

// ─── Detail views ────────────────────────────────────────────────────────────

/// A case with its suspect list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDetails {
  pub case:     Case,
  pub suspects: Vec<Suspect>,
}

/// Everything a culprit needs to pick their fake: the case plus the full
/// evidence pool, true statements and candidates alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricationDetails {
  pub case: Case,
  pub pool: Vec<OriginalEvidence>,
}

// ─── Rankings ────────────────────────────────────────────────────────────────

/// One row of a per-role ranking, ordered by score descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRow {
  /// 1-based position within the role.
  pub rank:     usize,
  pub user_id:  Uuid,
  pub nickname: String,
  pub score:    i64,
}
