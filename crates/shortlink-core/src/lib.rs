//! Core types and traits for the shortlink engine.
//!
//! This crate provides the domain types shared by the engine and the store
//! implementations, the [`KvStore`] capability the engine is built on, and
//! the [`Shortlinks`] interface exposed to transport layers.

pub mod base62;
pub mod error;
pub mod fingerprint;
pub mod record;
pub mod shortcode;
pub mod shortlinks;
pub mod store;

pub use error::{CoreError, ShortlinkError, StoreError};
pub use fingerprint::Fingerprint;
pub use record::{Shortlink, ShortlinkDetail};
pub use shortcode::ShortCode;
pub use shortlinks::Shortlinks;
pub use store::{KvStore, Ttl};
