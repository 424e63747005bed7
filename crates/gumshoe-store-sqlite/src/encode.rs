//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and the string-tagged enums through their `strum` tags.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use gumshoe_core::{
  case::{Case, CaseStatus},
  evidence::{OriginalEvidence, SubmittedEvidence, Suspect},
  ledger::{ScoreEntry, ScoreReason},
  participation::Participation,
  user::{User, UserRole},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Bounded integers ────────────────────────────────────────────────────────

/// A stored difficulty outside `u8` is corrupt data, rejected like an
/// unknown enum tag rather than truncated.
pub fn decode_difficulty(value: i64) -> Result<u8> {
  u8::try_from(value).map_err(|_| Error::DifficultyRange(value))
}

// ─── String-tagged enums ─────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<CaseStatus> {
  CaseStatus::from_str(s)
    .map_err(|_| gumshoe_core::Error::UnknownStatus(s.to_owned()).into())
}

pub fn decode_role(s: &str) -> Result<UserRole> {
  UserRole::from_str(s)
    .map_err(|_| gumshoe_core::Error::UnknownRole(s.to_owned()).into())
}

pub fn decode_reason(s: &str) -> Result<ScoreReason> {
  ScoreReason::from_str(s)
    .map_err(|_| gumshoe_core::Error::UnknownReason(s.to_owned()).into())
}

// ─── Raw row types ───────────────────────────────────────────────────────────
// Plain-string row images read inside `query_map` closures; converted to
// domain types once the rusqlite result set has been collected.

pub struct RawUser {
  pub user_id:  String,
  pub nickname: String,
  pub role:     String,
  pub score:    i64,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:  decode_uuid(&self.user_id)?,
      nickname: self.nickname,
      role:     decode_role(&self.role)?,
      score:    self.score,
    })
  }
}

pub struct RawCase {
  pub case_id:      String,
  pub title:        String,
  pub body:         String,
  pub difficulty:   i64,
  pub true_culprit: Option<String>,
  pub status:       String,
}

impl RawCase {
  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      case_id:      decode_uuid(&self.case_id)?,
      title:        self.title,
      body:         self.body,
      difficulty:   decode_difficulty(self.difficulty)?,
      true_culprit: decode_opt_uuid(self.true_culprit.as_deref())?,
      status:       decode_status(&self.status)?,
    })
  }
}

pub struct RawParticipation {
  pub participation_id: String,
  pub case_id:          String,
  pub client:           Option<String>,
  pub culprit:          Option<String>,
  pub police:           Option<String>,
  pub detective:        Option<String>,
  pub detective_guess:  Option<String>,
  pub solved:           Option<bool>,
}

impl RawParticipation {
  pub fn into_participation(self) -> Result<Participation> {
    Ok(Participation {
      participation_id: decode_uuid(&self.participation_id)?,
      case_id:          decode_uuid(&self.case_id)?,
      client:           decode_opt_uuid(self.client.as_deref())?,
      culprit:          decode_opt_uuid(self.culprit.as_deref())?,
      police:           decode_opt_uuid(self.police.as_deref())?,
      detective:        decode_opt_uuid(self.detective.as_deref())?,
      detective_guess:  decode_opt_uuid(self.detective_guess.as_deref())?,
      solved:           self.solved,
    })
  }
}

pub struct RawOriginalEvidence {
  pub evidence_id:       String,
  pub case_id:           String,
  pub description:       String,
  pub is_true:           bool,
  pub is_fake_candidate: bool,
}

impl RawOriginalEvidence {
  pub fn into_evidence(self) -> Result<OriginalEvidence> {
    Ok(OriginalEvidence {
      evidence_id:       decode_uuid(&self.evidence_id)?,
      case_id:           decode_uuid(&self.case_id)?,
      description:       self.description,
      is_true:           self.is_true,
      is_fake_candidate: self.is_fake_candidate,
    })
  }
}

pub struct RawSubmittedEvidence {
  pub submitted_id: String,
  pub case_id:      String,
  pub description:  String,
  pub is_true:      bool,
}

impl RawSubmittedEvidence {
  pub fn into_evidence(self) -> Result<SubmittedEvidence> {
    Ok(SubmittedEvidence {
      submitted_id: decode_uuid(&self.submitted_id)?,
      case_id:      decode_uuid(&self.case_id)?,
      description:  self.description,
      is_true:      self.is_true,
    })
  }
}

pub struct RawSuspect {
  pub suspect_id: String,
  pub case_id:    String,
  pub name:       String,
}

impl RawSuspect {
  pub fn into_suspect(self) -> Result<Suspect> {
    Ok(Suspect {
      suspect_id: decode_uuid(&self.suspect_id)?,
      case_id:    decode_uuid(&self.case_id)?,
      name:       self.name,
    })
  }
}

pub struct RawScoreEntry {
  pub entry_id:  String,
  pub user_id:   String,
  pub case_id:   String,
  pub delta:     i64,
  pub reason:    String,
  pub logged_at: String,
}

impl RawScoreEntry {
  pub fn into_entry(self) -> Result<ScoreEntry> {
    Ok(ScoreEntry {
      entry_id:  decode_uuid(&self.entry_id)?,
      user_id:   decode_uuid(&self.user_id)?,
      case_id:   decode_uuid(&self.case_id)?,
      delta:     self.delta,
      reason:    decode_reason(&self.reason)?,
      logged_at: decode_dt(&self.logged_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_outside_u8_is_a_decode_error() {
    assert!(matches!(
      decode_difficulty(999),
      Err(Error::DifficultyRange(999))
    ));
    assert!(matches!(
      decode_difficulty(-1),
      Err(Error::DifficultyRange(-1))
    ));
    assert_eq!(decode_difficulty(3).unwrap(), 3);
  }

  #[test]
  fn corrupt_case_row_is_rejected_not_truncated() {
    let raw = RawCase {
      case_id:      Uuid::new_v4().to_string(),
      title:        "t".into(),
      body:         "b".into(),
      difficulty:   300,
      true_culprit: None,
      status:       "registered".into(),
    };
    assert!(matches!(raw.into_case(), Err(Error::DifficultyRange(300))));
  }
}
