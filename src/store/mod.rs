//! # Store Module - Data Persistence Layer
//!
//! File-backed stores for the game's per-account and catalog state. Two
//! store shapes share one lifecycle:
//!
//! - [`RecordStore`] - an INI-backed table of `[section]` records, each a
//!   flat mapping of field name to scalar value. Values are stored as text
//!   and coerced back to the most specific type on read.
//! - [`DocumentStore`] - a JSON-backed tree of nested mappings addressed by
//!   dotted paths (`"20.2001.jobName"`), with partial updates that
//!   auto-create intermediate mapping nodes.
//!
//! ## Lifecycle
//!
//! Construct scoped to one file → the whole file is loaded into memory →
//! reads are served from memory → writes accumulate in memory → an explicit
//! `save()` flushes everything to disk. Nothing auto-saves: a handler that
//! mutates and forgets to call `save()` loses its changes when the instance
//! drops.
//!
//! ```text
//! data/
//! ├── records/        ← per-account INI tables (balances, flags)
//! ├── personal/       ← per-account JSON documents (catch logs)
//! └── catalog/        ← read-mostly JSON catalogs (jobs, shop, fish)
//! ```
//!
//! ## Persistence Guarantees
//!
//! Every `save()`:
//!
//! 1. acquires an advisory lock on `<file>.lock` (fail-fast timeout),
//! 2. writes the full serialized content to a temp file in the same
//!    directory, flushes and fsyncs it,
//! 3. atomically renames the temp file over the target.
//!
//! A reader therefore never observes a partially written file, and saves to
//! the same file from different processes never interleave.
//!
//! ## What This Layer Does Not Do
//!
//! There is no read-modify-write atomicity across a load and a later save.
//! Two handlers that each open the same file, mutate, and save will race;
//! the second save wins and the first one's changes are lost. Callers that
//! care must serialize at a higher level. There are also no multi-file
//! transactions, no rollback, and no retries.

pub mod atomic;
pub mod document;
pub mod record;
pub mod value;

pub use atomic::{atomic_write, FileLock};
pub use document::{DocumentStore, ValueKind};
pub use record::RecordStore;
pub use value::Scalar;
