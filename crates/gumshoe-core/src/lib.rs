//! Core types and trait definitions for the Gumshoe game backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate in the workspace depends on it; the workflow rules
//! and scoring arithmetic live here so backends cannot disagree on them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod error;
pub mod evidence;
pub mod ledger;
pub mod participation;
pub mod projection;
pub mod store;
pub mod user;
pub mod workflow;

pub use error::{Classify, Error, ErrorKind, Result};
