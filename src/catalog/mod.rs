//! # Catalog Module - Lookup Views over Document Stores
//!
//! Read-mostly views layered on [`DocumentStore`](crate::store::DocumentStore)
//! files, one per catalog shape:
//!
//! - [`JobCatalog`] - job listings keyed by a 4-digit code whose first two
//!   digits select a series; promotion chains are just adjacency in the
//!   numeric sort order of a series.
//! - [`ShopCatalog`] - shop items keyed by display name, with "did you
//!   mean" suggestions when an exact lookup misses.
//! - [`FishCatalog`] - fish species keyed by display name, each listing
//!   the bait values that can catch it.
//! - [`CreelStore`] - the one read-write view: per-account catch logs.
//!
//! Name matching lives in [`fuzzy`]: token ranking for job search,
//! character-level similarity for shop lookalikes.

pub mod creel;
pub mod fish;
pub mod fuzzy;
pub mod jobs;
pub mod shop;

pub use creel::{CreelRecord, CreelStore, CreelSummary};
pub use fish::{FishCatalog, FishRecord};
pub use fuzzy::{match_score, rank_names, similarity_ratio, tokenize};
pub use jobs::{JobCatalog, JobRecord};
pub use shop::{ShopCatalog, ShopItem};
