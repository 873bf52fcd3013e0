//! Storage backend trait abstraction
//!
//! Async domain traits implemented by every backend, so services stay
//! backend-agnostic.

pub mod prompt;
pub mod stats;
pub mod taxonomy;
pub mod user;

pub use prompt::PromptStore;
pub use stats::StatsStore;
pub use taxonomy::TaxonomyStore;
pub use user::{TokenStore, UserStore};
