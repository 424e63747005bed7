//! Players and their roles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The part a player takes in the game.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
  Client,
  Culprit,
  Police,
  Detective,
}

/// A registered player.
///
/// `score` is a cached running total; it is mutated only through ledger
/// awards and starts at zero. The ledger remains the audit source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:  Uuid,
  /// Unique display name; used for login and detective guesses.
  pub nickname: String,
  pub role:     UserRole,
  pub score:    i64,
}
