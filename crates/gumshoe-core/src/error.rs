//! Error taxonomy for `gumshoe-core`.
//!
//! Every operation failure is scoped to a single request; nothing here is
//! fatal to the process. [`Error::kind`] collapses the variants into the
//! three recoverable categories the presentation layer cares about.

use thiserror::Error;
use uuid::Uuid;

use crate::{case::CaseStatus, workflow::Operation};

#[derive(Debug, Error)]
pub enum Error {
  // ── InvalidInput ──────────────────────────────────────────────────────
  #[error("no fake evidence selected; fabrication was not performed")]
  EmptyFakeSelection,

  #[error("difficulty must be between 1 and 5, got {0}")]
  DifficultyOutOfRange(u8),

  #[error("nickname must not be empty")]
  EmptyNickname,

  // ── NotFound ──────────────────────────────────────────────────────────
  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("no user with nickname {0:?}")]
  NicknameNotFound(String),

  #[error("no participation record for case {0}")]
  ParticipationNotFound(Uuid),

  #[error("selected fake evidence not found among candidates: {0:?}")]
  FakeEvidenceNotFound(String),

  // ── Conflict / IllegalState ───────────────────────────────────────────
  #[error("case {0} already has a participation record")]
  ParticipationExists(Uuid),

  #[error("case {0} already has a culprit")]
  CulpritAlreadySet(Uuid),

  #[error("nickname {0:?} is already taken")]
  NicknameTaken(String),

  #[error("{op} is not allowed while the case is {from}")]
  InvalidTransition { op: Operation, from: CaseStatus },

  // ── Decode failures (corrupt or foreign data) ─────────────────────────
  #[error("unknown case status tag: {0:?}")]
  UnknownStatus(String),

  #[error("unknown user role tag: {0:?}")]
  UnknownRole(String),

  #[error("unknown score reason tag: {0:?}")]
  UnknownReason(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// The recoverable category of an [`Error`], used by the API layer to pick
/// an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Caller supplied a missing or malformed field; no state change.
  InvalidInput,
  /// A referenced entity does not exist; no state change.
  NotFound,
  /// A workflow guard was violated; no state change.
  Conflict,
  /// Anything else (decode/serialization failures).
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::EmptyFakeSelection
      | Self::DifficultyOutOfRange(_)
      | Self::EmptyNickname => ErrorKind::InvalidInput,

      Self::CaseNotFound(_)
      | Self::UserNotFound(_)
      | Self::NicknameNotFound(_)
      | Self::ParticipationNotFound(_)
      | Self::FakeEvidenceNotFound(_) => ErrorKind::NotFound,

      Self::ParticipationExists(_)
      | Self::CulpritAlreadySet(_)
      | Self::NicknameTaken(_)
      | Self::InvalidTransition { .. } => ErrorKind::Conflict,

      Self::UnknownStatus(_)
      | Self::UnknownRole(_)
      | Self::UnknownReason(_)
      | Self::Serialization(_) => ErrorKind::Internal,
    }
  }
}

/// Implemented by store error types so the presentation layer can map them
/// onto its own status codes without knowing the concrete backend.
pub trait Classify: std::error::Error {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind { Error::kind(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
