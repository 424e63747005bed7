//! Evidence — the seeded pool and the fabricated submission.
//!
//! Fabrication is a pure transformation: given the true statements, the
//! culprit's chosen fake, and the culprit's nickname, it produces the
//! submitted-evidence set shown to players. The store persists the result
//! with a wholesale replace, so re-fabrication substitutes rather than
//! appends.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token in a fake statement that is replaced by the culprit's nickname.
pub const NAME_PLACEHOLDER: &str = "{name}";

// ─── Seed data ───────────────────────────────────────────────────────────────

/// One statement from the immutable evidence pool seeded before gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalEvidence {
  pub evidence_id:       Uuid,
  pub case_id:           Uuid,
  pub description:       String,
  pub is_true:           bool,
  /// Whether a culprit may pick this statement as their fake.
  pub is_fake_candidate: bool,
}

/// Input to [`crate::store::GameStore::add_original_evidence`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvidence {
  pub case_id:           Uuid,
  pub description:       String,
  pub is_true:           bool,
  pub is_fake_candidate: bool,
}

/// A named suspect shown to the detective alongside a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspect {
  pub suspect_id: Uuid,
  pub case_id:    Uuid,
  pub name:       String,
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// One row of the materialised evidence set shown to players after
/// fabrication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedEvidence {
  pub submitted_id: Uuid,
  pub case_id:      Uuid,
  pub description:  String,
  pub is_true:      bool,
}

/// A submitted-evidence row before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
  pub description: String,
  pub is_true:     bool,
}

/// Substitute the culprit's nickname for every name placeholder.
pub fn substitute_culprit(description: &str, nickname: &str) -> String {
  description.replace(NAME_PLACEHOLDER, nickname)
}

/// Build the full submission: every true statement unchanged, plus the one
/// chosen fake with the placeholder substituted. Deterministic given the
/// same pool snapshot and selection.
pub fn build_submission(
  true_statements: &[OriginalEvidence],
  fake: &OriginalEvidence,
  culprit_nickname: &str,
) -> Vec<SubmissionDraft> {
  let mut drafts: Vec<SubmissionDraft> = true_statements
    .iter()
    .map(|e| SubmissionDraft {
      description: e.description.clone(),
      is_true:     true,
    })
    .collect();

  drafts.push(SubmissionDraft {
    description: substitute_culprit(&fake.description, culprit_nickname),
    is_true:     false,
  });

  drafts
}

#[cfg(test)]
mod tests {
  use super::*;

  fn statement(description: &str, is_true: bool, candidate: bool) -> OriginalEvidence {
    OriginalEvidence {
      evidence_id:       Uuid::new_v4(),
      case_id:           Uuid::new_v4(),
      description:       description.into(),
      is_true:           is_true,
      is_fake_candidate: candidate,
    }
  }

  #[test]
  fn substitution_replaces_every_placeholder() {
    let out = substitute_culprit("{name} was seen; {name} denied it", "Moriarty");
    assert_eq!(out, "Moriarty was seen; Moriarty denied it");
  }

  #[test]
  fn substitution_without_placeholder_is_identity() {
    assert_eq!(substitute_culprit("no token here", "Moriarty"), "no token here");
  }

  #[test]
  fn submission_is_all_truths_plus_one_fake() {
    let truths = vec![
      statement("the door was locked", true, false),
      statement("the safe was open", true, false),
    ];
    let fake = statement("It was {name}", false, true);

    let drafts = build_submission(&truths, &fake, "Moriarty");

    assert_eq!(drafts.len(), 3);
    assert_eq!(drafts.iter().filter(|d| d.is_true).count(), 2);
    let faked: Vec<_> = drafts.iter().filter(|d| !d.is_true).collect();
    assert_eq!(faked.len(), 1);
    assert_eq!(faked[0].description, "It was Moriarty");
  }
}
