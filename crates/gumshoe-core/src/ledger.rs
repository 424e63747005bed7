//! The score ledger — append-only record of score deltas.
//!
//! Entries are immutable. The cached `User::score` is a materialised view
//! over this ledger; every award appends an entry and bumps the cached
//! score inside the same transaction, so the two can always be reconciled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a ledger entry was written.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreReason {
  /// Culprit joined a registered case (+1).
  CulpritJoined,
  /// Police took the case at assignment time (+2).
  PoliceAssigned,
  /// Detective was assigned to the case (+1).
  DetectiveAssigned,
  /// Resolution payout to the detective for a correct guess.
  CaseSolved,
  /// Resolution payout to the culprit for an evaded guess.
  CaseUnsolved,
}

/// One immutable ledger row. Deltas may be negative; current call sites only
/// award non-negative amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
  pub entry_id:  Uuid,
  pub user_id:   Uuid,
  pub case_id:   Uuid,
  pub delta:     i64,
  pub reason:    ScoreReason,
  /// Server-assigned; never changes after the append.
  pub logged_at: DateTime<Utc>,
}

/// An award before it is persisted: the entry insert and the cached-score
/// increment for `user_id` commit together or not at all.
#[derive(Debug, Clone, Copy)]
pub struct Award {
  pub user_id: Uuid,
  pub delta:   i64,
  pub reason:  ScoreReason,
}

impl Award {
  pub fn new(user_id: Uuid, delta: i64, reason: ScoreReason) -> Self {
    Self { user_id, delta, reason }
  }
}
