//! SQLite backend for the Gumshoe game store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every workflow mutation runs
//! inside one immediate-mode transaction, which is what makes the
//! guard-check-then-write steps safe against concurrent operations on the
//! same case.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
