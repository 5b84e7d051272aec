//! # Herodex Core
//!
//! The hero catalogue without any transport attached.
//!
//! - [`Hero`] and its create/update payloads
//! - [`HeroStore`], the authoritative collection with full-snapshot persistence
//! - [`SnapshotStorage`] backends: an atomically replaced JSON file, or memory
//! - [`HeroQuery`], the filter → sort → paginate pipeline behind listing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hero;
pub mod query;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use hero::{Hero, HeroId, HeroPatch, NewHero};
pub use query::{HeroPage, HeroQuery, ListParams, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage};
pub use store::HeroStore;
