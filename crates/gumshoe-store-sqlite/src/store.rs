//! [`SqliteStore`] — the SQLite implementation of [`GameStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use gumshoe_core::{
  Error as CoreError,
  case::{Case, CaseStatus, NewCase},
  evidence::{
    self, NewEvidence, OriginalEvidence, SubmittedEvidence, Suspect,
  },
  ledger::{Award, ScoreEntry, ScoreReason},
  participation::Participation,
  projection::{
    AvailableCaseView, CaseDetails, ClientCaseView, CulpritCaseView,
    DetectiveCaseView, FabricationDetails, PoliceCaseView, RankingRow,
    UNASSIGNED, UNKNOWN, outcome_label,
  },
  store::GameStore,
  user::{User, UserRole},
  workflow::{self, GuessOutcome, Operation},
};

use crate::{
  Error, Result,
  encode::{
    RawCase, RawOriginalEvidence, RawParticipation, RawScoreEntry,
    RawSubmittedEvidence, RawSuspect, RawUser, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Closure error plumbing ──────────────────────────────────────────────────

/// Error type used inside `conn.call` closures: domain failures roll the
/// transaction back and surface as [`Error`]; raw database errors bubble
/// through [`tokio_rusqlite`].
enum TxError {
  App(Error),
  Db(rusqlite::Error),
}

impl From<Error> for TxError {
  fn from(e: Error) -> Self { Self::App(e) }
}

impl From<CoreError> for TxError {
  fn from(e: CoreError) -> Self { Self::App(Error::Core(e)) }
}

impl From<rusqlite::Error> for TxError {
  fn from(e: rusqlite::Error) -> Self { Self::Db(e) }
}

type TxResult<T> = std::result::Result<T, TxError>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Gumshoe game store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a read-only closure on the connection thread. A single call sees a
  /// single consistent snapshot — the connection serialises all access.
  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> TxResult<T> + Send + 'static,
  {
    let out: Result<T> = self
      .conn
      .call(move |conn| match f(conn) {
        Ok(v) => Ok(Ok(v)),
        Err(TxError::App(e)) => Ok(Err(e)),
        Err(TxError::Db(e)) => Err(e.into()),
      })
      .await?;
    out
  }

  /// Run a mutation inside one immediate-mode transaction. Guard checks and
  /// writes share the transaction, so concurrent operations on the same
  /// case serialise instead of racing past a guard. Any domain error rolls
  /// the whole transaction back.
  async fn with_tx<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Transaction<'_>) -> TxResult<T> + Send + 'static,
  {
    let out: Result<T> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(
          rusqlite::TransactionBehavior::Immediate,
        )?;
        match f(&tx) {
          Ok(v) => {
            tx.commit()?;
            Ok(Ok(v))
          }
          // Dropping `tx` rolls the transaction back.
          Err(TxError::App(e)) => Ok(Err(e)),
          Err(TxError::Db(e)) => Err(e.into()),
        }
      })
      .await?;
    out
  }
}

// ─── Row fetch helpers ───────────────────────────────────────────────────────

fn try_fetch_case(
  conn: &rusqlite::Connection,
  case_id: Uuid,
) -> TxResult<Option<Case>> {
  let raw = conn
    .query_row(
      "SELECT case_id, title, body, difficulty, true_culprit, status
       FROM cases WHERE case_id = ?1",
      rusqlite::params![encode_uuid(case_id)],
      |row| {
        Ok(RawCase {
          case_id:      row.get(0)?,
          title:        row.get(1)?,
          body:         row.get(2)?,
          difficulty:   row.get(3)?,
          true_culprit: row.get(4)?,
          status:       row.get(5)?,
        })
      },
    )
    .optional()?;
  Ok(raw.map(RawCase::into_case).transpose()?)
}

fn fetch_case(conn: &rusqlite::Connection, case_id: Uuid) -> TxResult<Case> {
  try_fetch_case(conn, case_id)?
    .ok_or_else(|| CoreError::CaseNotFound(case_id).into())
}

fn try_fetch_user(
  conn: &rusqlite::Connection,
  user_id: Uuid,
) -> TxResult<Option<User>> {
  let raw = conn
    .query_row(
      "SELECT user_id, nickname, role, score FROM users WHERE user_id = ?1",
      rusqlite::params![encode_uuid(user_id)],
      |row| {
        Ok(RawUser {
          user_id:  row.get(0)?,
          nickname: row.get(1)?,
          role:     row.get(2)?,
          score:    row.get(3)?,
        })
      },
    )
    .optional()?;
  Ok(raw.map(RawUser::into_user).transpose()?)
}

fn fetch_user(conn: &rusqlite::Connection, user_id: Uuid) -> TxResult<User> {
  try_fetch_user(conn, user_id)?
    .ok_or_else(|| CoreError::UserNotFound(user_id).into())
}

fn try_fetch_user_by_nickname(
  conn: &rusqlite::Connection,
  nickname: &str,
) -> TxResult<Option<User>> {
  let raw = conn
    .query_row(
      "SELECT user_id, nickname, role, score FROM users WHERE nickname = ?1",
      rusqlite::params![nickname],
      |row| {
        Ok(RawUser {
          user_id:  row.get(0)?,
          nickname: row.get(1)?,
          role:     row.get(2)?,
          score:    row.get(3)?,
        })
      },
    )
    .optional()?;
  Ok(raw.map(RawUser::into_user).transpose()?)
}

fn try_fetch_participation(
  conn: &rusqlite::Connection,
  case_id: Uuid,
) -> TxResult<Option<Participation>> {
  let raw = conn
    .query_row(
      "SELECT participation_id, case_id, client, culprit, police, detective,
              detective_guess, solved
       FROM participations WHERE case_id = ?1",
      rusqlite::params![encode_uuid(case_id)],
      map_participation_row,
    )
    .optional()?;
  Ok(raw.map(RawParticipation::into_participation).transpose()?)
}

fn fetch_participation(
  conn: &rusqlite::Connection,
  case_id: Uuid,
) -> TxResult<Participation> {
  try_fetch_participation(conn, case_id)?
    .ok_or_else(|| CoreError::ParticipationNotFound(case_id).into())
}

fn map_participation_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawParticipation> {
  Ok(RawParticipation {
    participation_id: row.get(0)?,
    case_id:          row.get(1)?,
    client:           row.get(2)?,
    culprit:          row.get(3)?,
    police:           row.get(4)?,
    detective:        row.get(5)?,
    detective_guess:  row.get(6)?,
    solved:           row.get(7)?,
  })
}

/// Resolve a user slot to a display label. An unfilled slot gets
/// `unfilled_label`; a filled slot whose user no longer resolves degrades to
/// the `"unknown"` sentinel instead of failing the caller's listing.
fn nickname_or(
  conn: &rusqlite::Connection,
  user: Option<Uuid>,
  unfilled_label: &str,
) -> TxResult<String> {
  let Some(id) = user else {
    return Ok(unfilled_label.to_owned());
  };
  let nick: Option<String> = conn
    .query_row(
      "SELECT nickname FROM users WHERE user_id = ?1",
      rusqlite::params![encode_uuid(id)],
      |row| row.get(0),
    )
    .optional()?;
  Ok(nick.unwrap_or_else(|| UNKNOWN.to_owned()))
}

fn suspect_names(
  conn: &rusqlite::Connection,
  case_id: Uuid,
) -> TxResult<Vec<String>> {
  let mut stmt = conn
    .prepare("SELECT name FROM suspects WHERE case_id = ?1 ORDER BY name")?;
  let names = stmt
    .query_map(rusqlite::params![encode_uuid(case_id)], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(names)
}

fn participations_by_column(
  conn: &rusqlite::Connection,
  column: &str,
  user_id: Uuid,
) -> TxResult<Vec<Participation>> {
  // `column` is always a compile-time constant below, never caller input.
  let sql = format!(
    "SELECT participation_id, case_id, client, culprit, police, detective,
            detective_guess, solved
     FROM participations WHERE {column} = ?1"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(user_id)], map_participation_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws
    .into_iter()
    .map(|r| r.into_participation().map_err(TxError::from))
    .collect()
}

// ─── Write helpers ───────────────────────────────────────────────────────────

fn set_status(
  conn: &rusqlite::Connection,
  case_id: Uuid,
  status: CaseStatus,
) -> TxResult<()> {
  conn.execute(
    "UPDATE cases SET status = ?1 WHERE case_id = ?2",
    rusqlite::params![status.to_string(), encode_uuid(case_id)],
  )?;
  Ok(())
}

/// Append a ledger entry and bump the user's cached score. Both statements
/// run inside the caller's transaction, so they commit together or not at
/// all — that is the ledger/score consistency invariant.
fn award(
  conn: &rusqlite::Connection,
  case_id: Uuid,
  a: Award,
) -> TxResult<ScoreEntry> {
  let changed = conn.execute(
    "UPDATE users SET score = score + ?1 WHERE user_id = ?2",
    rusqlite::params![a.delta, encode_uuid(a.user_id)],
  )?;
  if changed == 0 {
    return Err(CoreError::UserNotFound(a.user_id).into());
  }

  let entry = ScoreEntry {
    entry_id:  Uuid::new_v4(),
    user_id:   a.user_id,
    case_id,
    delta:     a.delta,
    reason:    a.reason,
    logged_at: Utc::now(),
  };
  conn.execute(
    "INSERT INTO score_log (entry_id, user_id, case_id, delta, reason, logged_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    rusqlite::params![
      encode_uuid(entry.entry_id),
      encode_uuid(entry.user_id),
      encode_uuid(entry.case_id),
      entry.delta,
      entry.reason.to_string(),
      encode_dt(entry.logged_at),
    ],
  )?;
  Ok(entry)
}

// ─── GameStore impl ──────────────────────────────────────────────────────────

impl GameStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register_user(
    &self,
    nickname: String,
    role: UserRole,
  ) -> Result<User> {
    if nickname.trim().is_empty() {
      return Err(CoreError::EmptyNickname.into());
    }

    let user = User {
      user_id: Uuid::new_v4(),
      nickname,
      role,
      score: 0,
    };
    let stored = user.clone();

    self
      .with_tx(move |tx| {
        if try_fetch_user_by_nickname(tx, &stored.nickname)?.is_some() {
          return Err(CoreError::NicknameTaken(stored.nickname).into());
        }
        tx.execute(
          "INSERT INTO users (user_id, nickname, role, score)
           VALUES (?1, ?2, ?3, 0)",
          rusqlite::params![
            encode_uuid(stored.user_id),
            stored.nickname,
            stored.role.to_string(),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.with_conn(move |conn| try_fetch_user(conn, id)).await
  }

  async fn user_by_nickname(&self, nickname: String) -> Result<Option<User>> {
    self
      .with_conn(move |conn| try_fetch_user_by_nickname(conn, &nickname))
      .await
  }

  // ── Seed data ─────────────────────────────────────────────────────────────

  async fn create_case(&self, input: NewCase) -> Result<Case> {
    input.validate()?;

    let case = Case {
      case_id:      Uuid::new_v4(),
      title:        input.title,
      body:         input.body,
      difficulty:   input.difficulty,
      true_culprit: None,
      status:       CaseStatus::Registered,
    };
    let stored = case.clone();

    self
      .with_tx(move |tx| {
        tx.execute(
          "INSERT INTO cases (case_id, title, body, difficulty, true_culprit, status)
           VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
          rusqlite::params![
            encode_uuid(stored.case_id),
            stored.title,
            stored.body,
            stored.difficulty,
            stored.status.to_string(),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(case)
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
    self.with_conn(move |conn| try_fetch_case(conn, id)).await
  }

  async fn list_cases_by_status(&self, status: CaseStatus) -> Result<Vec<Case>> {
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT case_id, title, body, difficulty, true_culprit, status
           FROM cases WHERE status = ?1",
        )?;
        let raws = stmt
          .query_map(rusqlite::params![status.to_string()], |row| {
            Ok(RawCase {
              case_id:      row.get(0)?,
              title:        row.get(1)?,
              body:         row.get(2)?,
              difficulty:   row.get(3)?,
              true_culprit: row.get(4)?,
              status:       row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws
          .into_iter()
          .map(|r| r.into_case().map_err(TxError::from))
          .collect()
      })
      .await
  }

  async fn add_original_evidence(
    &self,
    input: NewEvidence,
  ) -> Result<OriginalEvidence> {
    let statement = OriginalEvidence {
      evidence_id:       Uuid::new_v4(),
      case_id:           input.case_id,
      description:       input.description,
      is_true:           input.is_true,
      is_fake_candidate: input.is_fake_candidate,
    };
    let stored = statement.clone();

    self
      .with_tx(move |tx| {
        fetch_case(tx, stored.case_id)?;
        tx.execute(
          "INSERT INTO original_evidence
             (evidence_id, case_id, description, is_true, is_fake_candidate)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            encode_uuid(stored.evidence_id),
            encode_uuid(stored.case_id),
            stored.description,
            stored.is_true,
            stored.is_fake_candidate,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(statement)
  }

  async fn add_suspect(&self, case_id: Uuid, name: String) -> Result<Suspect> {
    let suspect = Suspect {
      suspect_id: Uuid::new_v4(),
      case_id,
      name,
    };
    let stored = suspect.clone();

    self
      .with_tx(move |tx| {
        fetch_case(tx, stored.case_id)?;
        tx.execute(
          "INSERT INTO suspects (suspect_id, case_id, name) VALUES (?1, ?2, ?3)",
          rusqlite::params![
            encode_uuid(stored.suspect_id),
            encode_uuid(stored.case_id),
            stored.name,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(suspect)
  }

  // ── Workflow mutations ────────────────────────────────────────────────────

  async fn open_case(
    &self,
    case_id: Uuid,
    client_id: Uuid,
  ) -> Result<Participation> {
    self
      .with_tx(move |tx| {
        let case = fetch_case(tx, case_id)?;
        workflow::check(Operation::ClientRequest, case.status)?;
        fetch_user(tx, client_id)?;

        if try_fetch_participation(tx, case_id)?.is_some() {
          return Err(CoreError::ParticipationExists(case_id).into());
        }

        let participation = Participation {
          participation_id: Uuid::new_v4(),
          case_id,
          client:           Some(client_id),
          culprit:          None,
          police:           None,
          detective:        None,
          detective_guess:  None,
          solved:           None,
        };
        tx.execute(
          "INSERT INTO participations (participation_id, case_id, client)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![
            encode_uuid(participation.participation_id),
            encode_uuid(case_id),
            encode_uuid(client_id),
          ],
        )?;
        Ok(participation)
      })
      .await
  }

  async fn join_culprit(
    &self,
    case_id: Uuid,
    culprit_id: Uuid,
  ) -> Result<Participation> {
    self
      .with_tx(move |tx| {
        let case = fetch_case(tx, case_id)?;
        workflow::check(Operation::CulpritJoin, case.status)?;

        let mut participation = fetch_participation(tx, case_id)?;
        if participation.culprit.is_some() {
          return Err(CoreError::CulpritAlreadySet(case_id).into());
        }
        fetch_user(tx, culprit_id)?;

        tx.execute(
          "UPDATE participations SET culprit = ?1 WHERE case_id = ?2",
          rusqlite::params![encode_uuid(culprit_id), encode_uuid(case_id)],
        )?;
        award(tx, case_id, Award::new(culprit_id, 1, ScoreReason::CulpritJoined))?;

        participation.culprit = Some(culprit_id);
        Ok(participation)
      })
      .await
  }

  async fn fabricate(
    &self,
    case_id: Uuid,
    culprit_id: Uuid,
    fake_description: String,
  ) -> Result<Case> {
    if fake_description.is_empty() {
      return Err(CoreError::EmptyFakeSelection.into());
    }

    self
      .with_tx(move |tx| {
        let mut case = fetch_case(tx, case_id)?;
        let next = workflow::check(Operation::Fabricate, case.status)?;
        fetch_participation(tx, case_id)?;
        let culprit = fetch_user(tx, culprit_id)?;

        let mut stmt = tx.prepare(
          "SELECT evidence_id, case_id, description, is_true, is_fake_candidate
           FROM original_evidence WHERE case_id = ?1",
        )?;
        let pool = stmt
          .query_map(rusqlite::params![encode_uuid(case_id)], |row| {
            Ok(RawOriginalEvidence {
              evidence_id:       row.get(0)?,
              case_id:           row.get(1)?,
              description:       row.get(2)?,
              is_true:           row.get(3)?,
              is_fake_candidate: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?
          .into_iter()
          .map(RawOriginalEvidence::into_evidence)
          .collect::<Result<Vec<_>>>()?;
        drop(stmt);

        let truths: Vec<OriginalEvidence> =
          pool.iter().filter(|e| e.is_true).cloned().collect();
        let fake = pool
          .iter()
          .find(|e| e.is_fake_candidate && e.description == fake_description)
          .ok_or(CoreError::FakeEvidenceNotFound(fake_description))?;

        // Re-fabrication replaces the previous submission wholesale.
        tx.execute(
          "DELETE FROM submitted_evidence WHERE case_id = ?1",
          rusqlite::params![encode_uuid(case_id)],
        )?;
        for draft in evidence::build_submission(&truths, fake, &culprit.nickname)
        {
          tx.execute(
            "INSERT INTO submitted_evidence (submitted_id, case_id, description, is_true)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              encode_uuid(Uuid::new_v4()),
              encode_uuid(case_id),
              draft.description,
              draft.is_true,
            ],
          )?;
        }

        // The true culprit is set exactly once, on the first fabrication.
        match case.true_culprit {
          None => {
            tx.execute(
              "UPDATE cases SET true_culprit = ?1 WHERE case_id = ?2",
              rusqlite::params![encode_uuid(culprit_id), encode_uuid(case_id)],
            )?;
            case.true_culprit = Some(culprit_id);
          }
          Some(existing) if existing != culprit_id => {
            tracing::warn!(
              %case_id,
              %existing,
              supplied = %culprit_id,
              "re-fabrication by a different culprit; keeping the original true culprit"
            );
          }
          Some(_) => {}
        }

        if let Some(status) = next {
          set_status(tx, case_id, status)?;
          case.status = status;
        }
        Ok(case)
      })
      .await
  }

  async fn police_accept(&self, case_id: Uuid, police_id: Uuid) -> Result<Case> {
    self
      .with_tx(move |tx| {
        let mut case = fetch_case(tx, case_id)?;
        let next = workflow::check(Operation::PoliceAccept, case.status)?;
        fetch_participation(tx, case_id)?;
        fetch_user(tx, police_id)?;

        tx.execute(
          "UPDATE participations SET police = ?1 WHERE case_id = ?2",
          rusqlite::params![encode_uuid(police_id), encode_uuid(case_id)],
        )?;

        if let Some(status) = next {
          set_status(tx, case_id, status)?;
          case.status = status;
        }
        Ok(case)
      })
      .await
  }

  async fn police_assign(
    &self,
    case_id: Uuid,
    police_id: Uuid,
    detective_id: Uuid,
  ) -> Result<Case> {
    self
      .with_tx(move |tx| {
        let mut case = fetch_case(tx, case_id)?;
        let next = workflow::check(Operation::PoliceAssign, case.status)?;
        fetch_participation(tx, case_id)?;
        fetch_user(tx, police_id)?;
        fetch_user(tx, detective_id)?;

        tx.execute(
          "UPDATE participations SET police = ?1, detective = ?2 WHERE case_id = ?3",
          rusqlite::params![
            encode_uuid(police_id),
            encode_uuid(detective_id),
            encode_uuid(case_id),
          ],
        )?;

        award(tx, case_id, Award::new(police_id, 2, ScoreReason::PoliceAssigned))?;
        award(
          tx,
          case_id,
          Award::new(detective_id, 1, ScoreReason::DetectiveAssigned),
        )?;

        if let Some(status) = next {
          set_status(tx, case_id, status)?;
          case.status = status;
        }
        Ok(case)
      })
      .await
  }

  async fn detective_guess(
    &self,
    case_id: Uuid,
    detective_id: Uuid,
    guess_nickname: String,
  ) -> Result<GuessOutcome> {
    self
      .with_tx(move |tx| {
        let case = fetch_case(tx, case_id)?;
        let next = workflow::check(Operation::DetectiveGuess, case.status)?;
        let participation = fetch_participation(tx, case_id)?;
        fetch_user(tx, detective_id)?;

        let guessed = try_fetch_user_by_nickname(tx, &guess_nickname)?
          .ok_or(CoreError::NicknameNotFound(guess_nickname))?;

        // Defensive default: a case with no true culprit is never solved.
        let is_solved = case.true_culprit == Some(guessed.user_id);

        tx.execute(
          "UPDATE participations SET detective_guess = ?1, solved = ?2
           WHERE case_id = ?3",
          rusqlite::params![
            encode_uuid(guessed.user_id),
            is_solved,
            encode_uuid(case_id),
          ],
        )?;

        let (detective_delta, culprit_delta) =
          workflow::settle(case.difficulty, is_solved);
        let reason = if is_solved {
          ScoreReason::CaseSolved
        } else {
          ScoreReason::CaseUnsolved
        };

        // One ledger entry per affected user, zero-delta side included, so
        // the event is auditable for both parties.
        award(tx, case_id, Award::new(detective_id, detective_delta, reason))?;
        if let Some(culprit_id) = participation.culprit {
          award(tx, case_id, Award::new(culprit_id, culprit_delta, reason))?;
        }

        let new_status = next.unwrap_or(case.status);
        set_status(tx, case_id, new_status)?;

        let actual_culprit_nickname =
          nickname_or(tx, case.true_culprit, UNKNOWN)?;

        Ok(GuessOutcome {
          is_solved,
          detective_score_change: detective_delta,
          culprit_score_change: culprit_delta,
          actual_culprit_nickname,
          new_status,
        })
      })
      .await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn participation_for_case(
    &self,
    case_id: Uuid,
  ) -> Result<Option<Participation>> {
    self
      .with_conn(move |conn| try_fetch_participation(conn, case_id))
      .await
  }

  async fn case_details(&self, case_id: Uuid) -> Result<Option<CaseDetails>> {
    self
      .with_conn(move |conn| {
        let Some(case) = try_fetch_case(conn, case_id)? else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT suspect_id, case_id, name FROM suspects
           WHERE case_id = ?1 ORDER BY name",
        )?;
        let suspects = stmt
          .query_map(rusqlite::params![encode_uuid(case_id)], |row| {
            Ok(RawSuspect {
              suspect_id: row.get(0)?,
              case_id:    row.get(1)?,
              name:       row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?
          .into_iter()
          .map(RawSuspect::into_suspect)
          .collect::<Result<Vec<_>>>()?;

        Ok(Some(CaseDetails { case, suspects }))
      })
      .await
  }

  async fn fabrication_details(
    &self,
    case_id: Uuid,
  ) -> Result<Option<FabricationDetails>> {
    self
      .with_conn(move |conn| {
        let Some(case) = try_fetch_case(conn, case_id)? else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT evidence_id, case_id, description, is_true, is_fake_candidate
           FROM original_evidence WHERE case_id = ?1",
        )?;
        let pool = stmt
          .query_map(rusqlite::params![encode_uuid(case_id)], |row| {
            Ok(RawOriginalEvidence {
              evidence_id:       row.get(0)?,
              case_id:           row.get(1)?,
              description:       row.get(2)?,
              is_true:           row.get(3)?,
              is_fake_candidate: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?
          .into_iter()
          .map(RawOriginalEvidence::into_evidence)
          .collect::<Result<Vec<_>>>()?;

        Ok(Some(FabricationDetails { case, pool }))
      })
      .await
  }

  async fn submitted_evidence(
    &self,
    case_id: Uuid,
  ) -> Result<Vec<SubmittedEvidence>> {
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT submitted_id, case_id, description, is_true
           FROM submitted_evidence WHERE case_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![encode_uuid(case_id)], |row| {
            Ok(RawSubmittedEvidence {
              submitted_id: row.get(0)?,
              case_id:      row.get(1)?,
              description:  row.get(2)?,
              is_true:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
          .into_iter()
          .map(|r| r.into_evidence().map_err(TxError::from))
          .collect()
      })
      .await
  }

  async fn culprit_nickname(&self, case_id: Uuid) -> Result<String> {
    self
      .with_conn(move |conn| {
        let culprit = try_fetch_participation(conn, case_id)?
          .and_then(|p| p.culprit);
        nickname_or(conn, culprit, UNKNOWN)
      })
      .await
  }

  // ── Role listings ─────────────────────────────────────────────────────────

  async fn culprit_open_cases(&self) -> Result<Vec<AvailableCaseView>> {
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.participation_id, c.case_id, c.title, c.body, c.difficulty,
                  u.nickname
           FROM participations p
           JOIN cases c ON c.case_id = p.case_id
           JOIN users u ON u.user_id = p.client
           WHERE c.status = ?1 AND p.culprit IS NULL",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![CaseStatus::Registered.to_string()],
            |row| {
              Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
              ))
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        rows
          .into_iter()
          .map(|(pid, cid, title, body, difficulty, nickname)| {
            Ok(AvailableCaseView {
              participation_id: crate::encode::decode_uuid(&pid)?,
              case_id:          crate::encode::decode_uuid(&cid)?,
              title,
              body,
              difficulty: crate::encode::decode_difficulty(difficulty)?,
              client_nickname: nickname,
            })
          })
          .collect()
      })
      .await
  }

  async fn culprit_cases(&self, culprit_id: Uuid) -> Result<Vec<CulpritCaseView>> {
    self
      .with_conn(move |conn| {
        let mut views = Vec::new();
        for p in participations_by_column(conn, "culprit", culprit_id)? {
          let Some(case) = try_fetch_case(conn, p.case_id)? else {
            continue;
          };
          views.push(CulpritCaseView {
            participation_id: p.participation_id,
            case_id:          case.case_id,
            title:            case.title,
            body:             case.body,
            difficulty:       case.difficulty,
            client_nickname:  nickname_or(conn, p.client, UNKNOWN)?,
            status:           case.status,
            fake_selected:    case.status >= CaseStatus::Fabricated,
          });
        }
        Ok(views)
      })
      .await
  }

  async fn client_cases(&self, client_id: Uuid) -> Result<Vec<ClientCaseView>> {
    self
      .with_conn(move |conn| {
        let mut views = Vec::new();
        for p in participations_by_column(conn, "client", client_id)? {
          let Some(case) = try_fetch_case(conn, p.case_id)? else {
            continue;
          };
          let outcome = if case.status == CaseStatus::ResultChecked {
            p.solved.map(|s| outcome_label(s).to_owned())
          } else {
            None
          };
          views.push(ClientCaseView {
            participation_id:   p.participation_id,
            case_id:            case.case_id,
            title:              case.title,
            body:               case.body,
            difficulty:         case.difficulty,
            detective_nickname: nickname_or(conn, p.detective, UNASSIGNED)?,
            status:             case.status,
            outcome,
          });
        }
        Ok(views)
      })
      .await
  }

  async fn pending_cases_for_police(
    &self,
    police_id: Uuid,
  ) -> Result<Vec<PoliceCaseView>> {
    self
      .with_conn(move |conn| {
        // Full scan with in-memory filter; participation volume is low.
        let mut stmt = conn.prepare(
          "SELECT participation_id, case_id, client, culprit, police,
                  detective, detective_guess, solved
           FROM participations",
        )?;
        let raws = stmt
          .query_map([], map_participation_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);

        let mut views = Vec::new();
        for raw in raws {
          let p = raw.into_participation()?;
          let Some(case) = try_fetch_case(conn, p.case_id)? else {
            continue;
          };

          let pending = matches!(
            case.status,
            CaseStatus::Fabricated | CaseStatus::Accepting
          );
          let mine_or_unclaimed =
            p.police.is_none() || p.police == Some(police_id);
          if !(pending && mine_or_unclaimed) {
            continue;
          }

          views.push(police_case_view(conn, &p, case)?);
        }
        Ok(views)
      })
      .await
  }

  async fn police_cases(&self, police_id: Uuid) -> Result<Vec<PoliceCaseView>> {
    self
      .with_conn(move |conn| {
        let mut views = Vec::new();
        for p in participations_by_column(conn, "police", police_id)? {
          let Some(case) = try_fetch_case(conn, p.case_id)? else {
            continue;
          };
          views.push(police_case_view(conn, &p, case)?);
        }
        Ok(views)
      })
      .await
  }

  async fn detective_cases(
    &self,
    detective_id: Uuid,
    status: CaseStatus,
  ) -> Result<Vec<DetectiveCaseView>> {
    self
      .with_conn(move |conn| {
        let mut views = Vec::new();
        for p in participations_by_column(conn, "detective", detective_id)? {
          let Some(case) = try_fetch_case(conn, p.case_id)? else {
            continue;
          };
          if case.status != status {
            continue;
          }

          let settled = case.status == CaseStatus::ResultChecked;
          let guess_nickname = if settled {
            match p.detective_guess {
              Some(id) => Some(nickname_or(conn, Some(id), UNKNOWN)?),
              None => None,
            }
          } else {
            None
          };
          let outcome = if settled {
            p.solved.map(|s| outcome_label(s).to_owned())
          } else {
            None
          };
          let actual_culprit = if settled {
            Some(nickname_or(conn, case.true_culprit, UNKNOWN)?)
          } else {
            None
          };

          views.push(DetectiveCaseView {
            participation_id: p.participation_id,
            case_id:          case.case_id,
            title:            case.title,
            body:             case.body,
            difficulty:       case.difficulty,
            client_nickname:  nickname_or(conn, p.client, UNKNOWN)?,
            police_nickname:  nickname_or(conn, p.police, UNKNOWN)?,
            status:           case.status,
            suspects:         suspect_names(conn, case.case_id)?,
            guess_nickname,
            outcome,
            actual_culprit,
          });
        }
        Ok(views)
      })
      .await
  }

  // ── Ledger & rankings ─────────────────────────────────────────────────────

  async fn score_log(&self, user_id: Uuid) -> Result<Vec<ScoreEntry>> {
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, user_id, case_id, delta, reason, logged_at
           FROM score_log WHERE user_id = ?1 ORDER BY logged_at DESC",
        )?;
        let raws = stmt
          .query_map(rusqlite::params![encode_uuid(user_id)], |row| {
            Ok(RawScoreEntry {
              entry_id:  row.get(0)?,
              user_id:   row.get(1)?,
              case_id:   row.get(2)?,
              delta:     row.get(3)?,
              reason:    row.get(4)?,
              logged_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws
          .into_iter()
          .map(|r| r.into_entry().map_err(TxError::from))
          .collect()
      })
      .await
  }

  async fn ranking(&self, role: UserRole) -> Result<Vec<RankingRow>> {
    self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, nickname, score FROM users
           WHERE role = ?1 ORDER BY score DESC, nickname ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![role.to_string()], |row| {
            Ok((
              row.get::<_, String>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, i64>(2)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        rows
          .into_iter()
          .enumerate()
          .map(|(i, (id, nickname, score))| {
            Ok(RankingRow {
              rank:     i + 1,
              user_id:  crate::encode::decode_uuid(&id)?,
              nickname,
              score,
            })
          })
          .collect()
      })
      .await
  }
}

/// Shared shaping for the two police listings.
fn police_case_view(
  conn: &rusqlite::Connection,
  p: &Participation,
  case: Case,
) -> TxResult<PoliceCaseView> {
  Ok(PoliceCaseView {
    participation_id: p.participation_id,
    case_id:          case.case_id,
    title:            case.title,
    body:             case.body,
    difficulty:       case.difficulty,
    status:           case.status,
    client_nickname:  nickname_or(conn, p.client, UNKNOWN)?,
    culprit_nickname: nickname_or(conn, p.culprit, UNASSIGNED)?,
  })
}
