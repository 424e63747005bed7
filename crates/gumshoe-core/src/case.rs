//! Cases — one instance of the mystery scenario being played.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Workflow status of a case. A case only ever moves forward through this
/// ordering; the allowed moves live in [`crate::workflow`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseStatus {
  /// Seeded and open for a client request and a culprit to join.
  Registered,
  /// The culprit has submitted fabricated evidence.
  Fabricated,
  /// A police officer has accepted the case but not yet assigned a
  /// detective.
  Accepting,
  /// Police and detective are both assigned.
  Assigned,
  /// The detective has guessed and scores are settled. Terminal.
  ResultChecked,
}

/// A mystery case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
  pub case_id:      Uuid,
  pub title:        String,
  pub body:         String,
  /// 1 (easy) through 5 (hard); the resolution payout is `difficulty * 10`.
  pub difficulty:   u8,
  /// Set exactly once, on the case's first successful fabrication, and
  /// never overwritten afterwards.
  pub true_culprit: Option<Uuid>,
  pub status:       CaseStatus,
}

/// Input to [`crate::store::GameStore::create_case`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewCase {
  pub title:      String,
  pub body:       String,
  pub difficulty: u8,
}

impl NewCase {
  /// Reject difficulties outside the 1–5 scale before anything is persisted.
  pub fn validate(&self) -> Result<()> {
    if !(1..=5).contains(&self.difficulty) {
      return Err(Error::DifficultyOutOfRange(self.difficulty));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn status_tags_roundtrip() {
    for status in [
      CaseStatus::Registered,
      CaseStatus::Fabricated,
      CaseStatus::Accepting,
      CaseStatus::Assigned,
      CaseStatus::ResultChecked,
    ] {
      let tag = status.to_string();
      assert_eq!(CaseStatus::from_str(&tag).unwrap(), status);
    }
  }

  #[test]
  fn status_ordering_is_forward() {
    assert!(CaseStatus::Registered < CaseStatus::Fabricated);
    assert!(CaseStatus::Fabricated < CaseStatus::Accepting);
    assert!(CaseStatus::Accepting < CaseStatus::Assigned);
    assert!(CaseStatus::Assigned < CaseStatus::ResultChecked);
  }

  #[test]
  fn new_case_difficulty_bounds() {
    let case = NewCase {
      title:      "t".into(),
      body:       "b".into(),
      difficulty: 0,
    };
    assert!(case.validate().is_err());

    let case = NewCase { difficulty: 3, ..case };
    assert!(case.validate().is_ok());
  }
}
