//! # Cityvault - Storage Layer for Chat-Bot Economy Games
//!
//! Cityvault is the persistence layer behind a text-command economy/RPG game
//! (check-in, jobs, banking, shop, robbery, fishing) running on a chat
//! platform. Command handlers are short-lived tasks: each one opens a store
//! over a single data file, reads and mutates it in memory, and persists the
//! result with an explicit `save()`.
//!
//! ## Features
//!
//! - **Record Store**: INI-backed section/key tables with type-sniffing
//!   coercion, used for per-account balances, timestamps, and status flags.
//! - **Document Store**: JSON-backed nested trees addressed by dotted paths,
//!   used for catalogs (jobs, shop items, fish species) and per-account
//!   nested records (catch logs).
//! - **Crash-Safe Writes**: every save goes through a same-directory temp
//!   file, fsync, and atomic rename; a reader never sees a partial file.
//! - **Cross-Process Locking**: saves to the same file are serialized by an
//!   advisory lock on a derived `.lock` file, with a fail-fast timeout.
//! - **Catalog Views**: fuzzy "did you mean" lookup, promotion-chain
//!   traversal, and uniform random picks layered on the Document Store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cityvault::store::{RecordStore, Scalar};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cityvault::error::StoreError> {
//!     let mut store = RecordStore::open("./data", "records", "briefly.ini").await?;
//!
//!     let _coins = store.read_key("10001", "coins", Some(Scalar::Int(0)))?;
//!     store.update_key("10001", "coins", Scalar::Int(250))?;
//!     store.save().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Record and Document stores plus the atomic-write and
//!   lock primitives they share
//! - [`catalog`] - Read-mostly catalog views built on the Document Store
//! - [`config`] - Storage configuration loading
//! - [`error`] - The storage error taxonomy
//! - [`validation`] - Path-component validation for caller-supplied names
//!
//! ## Concurrency Contract
//!
//! Store instances are per-call and never shared: every construction
//! re-reads the file from disk, and cross-process correctness comes from
//! the file lock held during `save()`. Two handlers that each load, mutate,
//! and save the same section will race, and the second save overwrites the
//! first (a lost update). That is the documented contract of this layer,
//! not a defect; see the [`store`] module docs.

pub mod catalog;
pub mod config;
pub mod error;
pub mod store;
pub mod validation;
