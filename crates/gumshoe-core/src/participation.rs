//! Participation — who plays which role in a case, and how it ended.
//!
//! Exactly one participation record exists per case (enforced at creation),
//! created when a client requests the case and progressively filled in by
//! the culprit-join, police, and detective operations. It is never deleted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role assignments and outcome fields tied 1:1 to a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
  pub participation_id: Uuid,
  pub case_id:          Uuid,
  pub client:           Option<Uuid>,
  /// Once set, never reassigned: a case has exactly one culprit for its
  /// lifetime.
  pub culprit:          Option<Uuid>,
  pub police:           Option<Uuid>,
  pub detective:        Option<Uuid>,
  /// The user the detective accused, resolved from a nickname.
  pub detective_guess:  Option<Uuid>,
  /// `None` until the detective has guessed.
  pub solved:           Option<bool>,
}
