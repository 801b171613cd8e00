//! # forksync-update
//!
//! Periodic "is there a newer release?" check.
//!
//! [`UpdateCache`] gates an injected [`VersionLookup`] behind a time-to-live
//! recorded in a small JSON file, so the network is consulted at most once
//! per period.

pub mod cache;
pub mod error;
pub mod lookup;

pub use cache::{cache_path_at, default_cache_path, UpdateCache, UpdateCacheRecord, UpdateCheck};
pub use error::UpdateError;
pub use lookup::{CratesIoLookup, VersionLookup};
