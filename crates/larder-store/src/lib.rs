//! File-backed key-value store for larder.
//!
//! A [`Store`] couples one flat text file with one in-memory cache. Opening
//! hydrates the cache from the file; reads are served from the cache; every
//! mutation updates the cache and synchronously rewrites the file. The
//! format is the line codec from [`larder_codec`]: `key="value"`, one entry
//! per line.
//!
//! # Contract
//!
//! - Key lookup is case-insensitive everywhere; stored casing is the first
//!   write's.
//! - Every accessor fails with [`StoreError::NotOpen`] until
//!   [`Store::open`] (or [`Store::recreate`]) has run.
//! - A typed read of a malformed value degrades to `None`, never an error
//!   (see the typed accessors on [`Store`]).
//! - One mutex per store serializes callers; a `Store` is `Send + Sync`
//!   and is usually shared as an `Arc<Store>`.
//!
//! Writes are full-file rewrites, O(cache size) per call -- the intended
//! scale is a device-local catalog or settings file, not a high-write-rate
//! system.

pub mod error;
pub mod store;
mod typed;

pub use error::{Result, StoreError};
pub use store::{Durability, Store, StoreOptions};
