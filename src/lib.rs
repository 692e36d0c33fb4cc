//! Gazette - daily recap fragment service for the Gigachad leaderboard
//!
//! Gazette pulls the leaderboard's JSON snapshots and the public profile
//! API, normalizes and deduplicates the activity feeds, and serves rendered
//! HTML fragments per page section with a short-TTL cache.
//!
//! ## Services
//!
//! - **Sources**: snapshot and profile-directory retrieval with
//!   default-on-failure semantics
//! - **Recap**: activity dedup, missing-interaction computation, fragment
//!   orchestration
//! - **Cache**: TTL-bounded fragment store with lazy eviction
//! - **Render**: HTML fragments matching the legacy page's markup
//! - **Server**: hyper HTTP surface serving fragments by section name

pub mod cache;
pub mod config;
pub mod model;
pub mod recap;
pub mod render;
pub mod routes;
pub mod server;
pub mod sources;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GazetteError, Result};
