//! Shortlink engine implementation.
//!
//! This crate provides the [`ShortlinkEngine`] together with the pieces it
//! is built from: the [`CodeAllocator`], the [`DedupIndex`] and the store
//! [`Keyspace`]. Core types are re-exported from `shortlink_core`.

pub mod allocator;
pub mod dedup;
pub mod engine;
pub mod keys;
pub mod settings;

pub use allocator::CodeAllocator;
pub use dedup::DedupIndex;
pub use engine::ShortlinkEngine;
pub use keys::Keyspace;
pub use settings::EngineSettings;
pub use shortlink_core::{Shortlink, ShortlinkDetail, ShortlinkError, Shortlinks};
