//! The case workflow state machine.
//!
//! The allowed moves live in one transition table here rather than as
//! ad hoc status checks scattered across store methods. Each operation
//! declares the statuses it may start from and the status it lands on;
//! [`check`] is the single guard every mutation goes through.

use serde::{Deserialize, Serialize};

use crate::{
  case::CaseStatus,
  error::{Error, Result},
};

// ─── Operations ──────────────────────────────────────────────────────────────

/// A workflow operation that may touch a case's status.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
  /// A client requests the case, creating its participation record.
  ClientRequest,
  /// A culprit claims the case.
  CulpritJoin,
  /// The culprit submits fabricated evidence. Allowed again from
  /// `Fabricated` because re-fabrication replaces the submission.
  Fabricate,
  /// A police officer accepts the case ahead of assigning a detective.
  PoliceAccept,
  /// Police and detective are assigned together.
  PoliceAssign,
  /// The detective accuses a suspect; scores settle and the case closes.
  DetectiveGuess,
}

impl Operation {
  /// The statuses this operation may be applied from.
  pub fn allowed_from(self) -> &'static [CaseStatus] {
    use CaseStatus::*;
    match self {
      Self::ClientRequest => &[Registered],
      Self::CulpritJoin => &[Registered],
      Self::Fabricate => &[Registered, Fabricated],
      Self::PoliceAccept => &[Fabricated],
      Self::PoliceAssign => &[Fabricated, Accepting],
      Self::DetectiveGuess => &[Assigned],
    }
  }

  /// The status the case lands on, or `None` if the operation leaves the
  /// status untouched.
  pub fn target(self) -> Option<CaseStatus> {
    match self {
      Self::ClientRequest | Self::CulpritJoin => None,
      Self::Fabricate => Some(CaseStatus::Fabricated),
      Self::PoliceAccept => Some(CaseStatus::Accepting),
      Self::PoliceAssign => Some(CaseStatus::Assigned),
      Self::DetectiveGuess => Some(CaseStatus::ResultChecked),
    }
  }
}

/// Guard `op` against the case's current status. Returns the status the case
/// should move to (`None` for no change), or the violated-guard error.
pub fn check(op: Operation, from: CaseStatus) -> Result<Option<CaseStatus>> {
  if !op.allowed_from().contains(&from) {
    return Err(Error::InvalidTransition { op, from });
  }
  Ok(op.target())
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// The resolution payout for a case of the given difficulty.
pub fn base_score(difficulty: u8) -> i64 { i64::from(difficulty) * 10 }

/// Winner-take-all settlement: `(detective_delta, culprit_delta)`.
/// Exactly one side receives the payout; the other receives zero.
pub fn settle(difficulty: u8, is_solved: bool) -> (i64, i64) {
  let payout = base_score(difficulty);
  if is_solved { (payout, 0) } else { (0, payout) }
}

// ─── Result record ───────────────────────────────────────────────────────────

/// Returned by [`crate::store::GameStore::detective_guess`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessOutcome {
  pub is_solved:              bool,
  pub detective_score_change: i64,
  pub culprit_score_change:   i64,
  /// Sentinel `"unknown"` when the true culprit was never set or no longer
  /// resolves.
  pub actual_culprit_nickname: String,
  pub new_status:             CaseStatus,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::case::CaseStatus::*;

  #[test]
  fn happy_path_transitions() {
    assert_eq!(check(Operation::ClientRequest, Registered).unwrap(), None);
    assert_eq!(check(Operation::CulpritJoin, Registered).unwrap(), None);
    assert_eq!(
      check(Operation::Fabricate, Registered).unwrap(),
      Some(Fabricated)
    );
    assert_eq!(
      check(Operation::PoliceAccept, Fabricated).unwrap(),
      Some(Accepting)
    );
    assert_eq!(
      check(Operation::PoliceAssign, Accepting).unwrap(),
      Some(Assigned)
    );
    assert_eq!(
      check(Operation::DetectiveGuess, Assigned).unwrap(),
      Some(ResultChecked)
    );
  }

  #[test]
  fn assign_allowed_without_prior_accept() {
    assert_eq!(
      check(Operation::PoliceAssign, Fabricated).unwrap(),
      Some(Assigned)
    );
  }

  #[test]
  fn refabrication_is_allowed() {
    assert_eq!(
      check(Operation::Fabricate, Fabricated).unwrap(),
      Some(Fabricated)
    );
  }

  #[test]
  fn no_backward_or_skipped_transitions() {
    assert!(check(Operation::CulpritJoin, Fabricated).is_err());
    assert!(check(Operation::Fabricate, Assigned).is_err());
    assert!(check(Operation::PoliceAccept, Registered).is_err());
    assert!(check(Operation::DetectiveGuess, Accepting).is_err());
    assert!(check(Operation::DetectiveGuess, ResultChecked).is_err());
    assert!(check(Operation::ClientRequest, ResultChecked).is_err());
  }

  #[test]
  fn settlement_is_winner_take_all() {
    assert_eq!(settle(3, true), (30, 0));
    assert_eq!(settle(3, false), (0, 30));
    assert_eq!(settle(5, true), (50, 0));
  }
}
