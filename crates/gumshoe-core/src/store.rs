//! The `GameStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `gumshoe-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Every workflow mutation executes as a single all-or-nothing unit: the
//! participation update, the case status/true-culprit update, and any
//! ledger awards commit together or all roll back. Backends must protect
//! the guard-check-then-write step so concurrent operations on the same
//! case cannot race past a guard.

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::{Case, CaseStatus, NewCase},
  evidence::{NewEvidence, OriginalEvidence, SubmittedEvidence, Suspect},
  ledger::ScoreEntry,
  participation::Participation,
  projection::{
    AvailableCaseView, CaseDetails, ClientCaseView, CulpritCaseView,
    DetectiveCaseView, FabricationDetails, PoliceCaseView, RankingRow,
  },
  user::{User, UserRole},
  workflow::GuessOutcome,
};

/// Abstraction over a Gumshoe game-state backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GameStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user with score 0. Fails if the nickname is taken or empty.
  fn register_user(
    &self,
    nickname: String,
    role: UserRole,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Login lookup by unique nickname. Returns `None` if not found.
  fn user_by_nickname(
    &self,
    nickname: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Seed data ─────────────────────────────────────────────────────────

  /// Persist a new case in `Registered` status with no true culprit.
  fn create_case(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  fn list_cases_by_status(
    &self,
    status: CaseStatus,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Seed one statement into a case's immutable evidence pool.
  fn add_original_evidence(
    &self,
    input: NewEvidence,
  ) -> impl Future<Output = Result<OriginalEvidence, Self::Error>> + Send + '_;

  /// Seed a named suspect for a case.
  fn add_suspect(
    &self,
    case_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Suspect, Self::Error>> + Send + '_;

  // ── Workflow mutations ────────────────────────────────────────────────

  /// Client requests a case: creates the participation record with the
  /// client slot filled. Rejects a second participation for the same case.
  fn open_case(
    &self,
    case_id: Uuid,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Participation, Self::Error>> + Send + '_;

  /// Culprit claims a case. Exactly-once: a concurrent second join fails
  /// with a culprit-already-set conflict. Awards +1 to the culprit.
  fn join_culprit(
    &self,
    case_id: Uuid,
    culprit_id: Uuid,
  ) -> impl Future<Output = Result<Participation, Self::Error>> + Send + '_;

  /// Fabricate the submitted-evidence set for a case and advance it to
  /// `Fabricated`. Sets the true culprit if, and only if, it was unset.
  /// Re-fabrication replaces the submission wholesale.
  fn fabricate(
    &self,
    case_id: Uuid,
    culprit_id: Uuid,
    fake_description: String,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Police accepts a case ahead of assignment; status moves to
  /// `Accepting`.
  fn police_accept(
    &self,
    case_id: Uuid,
    police_id: Uuid,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Assign police and detective together; awards +2 to the police and +1
  /// to the detective, and the status moves to `Assigned`.
  fn police_assign(
    &self,
    case_id: Uuid,
    police_id: Uuid,
    detective_id: Uuid,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Detective accuses a suspect by nickname. Settles the winner-take-all
  /// payout, closes the case, and reports the outcome.
  fn detective_guess(
    &self,
    case_id: Uuid,
    detective_id: Uuid,
    guess_nickname: String,
  ) -> impl Future<Output = Result<GuessOutcome, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn participation_for_case(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Option<Participation>, Self::Error>> + Send + '_;

  /// The case plus its suspect list. Returns `None` for a missing case.
  fn case_details(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Option<CaseDetails>, Self::Error>> + Send + '_;

  /// The case plus its full original-evidence pool.
  fn fabrication_details(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Option<FabricationDetails>, Self::Error>> + Send + '_;

  fn submitted_evidence(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<SubmittedEvidence>, Self::Error>> + Send + '_;

  /// The joined culprit's nickname, or the `"unknown"` sentinel.
  fn culprit_nickname(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  // ── Role listings ─────────────────────────────────────────────────────

  /// Registered cases with a client and no culprit yet.
  fn culprit_open_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<AvailableCaseView>, Self::Error>> + Send + '_;

  fn culprit_cases(
    &self,
    culprit_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CulpritCaseView>, Self::Error>> + Send + '_;

  fn client_cases(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ClientCaseView>, Self::Error>> + Send + '_;

  /// Fabricated or accepting cases that are unassigned or already held by
  /// this officer.
  fn pending_cases_for_police(
    &self,
    police_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PoliceCaseView>, Self::Error>> + Send + '_;

  /// Every case this officer holds, regardless of status.
  fn police_cases(
    &self,
    police_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PoliceCaseView>, Self::Error>> + Send + '_;

  /// This detective's cases in exactly `status` (assigned or
  /// result-checked in practice).
  fn detective_cases(
    &self,
    detective_id: Uuid,
    status: CaseStatus,
  ) -> impl Future<Output = Result<Vec<DetectiveCaseView>, Self::Error>> + Send + '_;

  // ── Ledger & rankings ─────────────────────────────────────────────────

  /// A user's ledger entries, newest first.
  fn score_log(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScoreEntry>, Self::Error>> + Send + '_;

  /// Users of `role` ordered by score descending, with 1-based ranks.
  fn ranking(
    &self,
    role: UserRole,
  ) -> impl Future<Output = Result<Vec<RankingRow>, Self::Error>> + Send + '_;
}
