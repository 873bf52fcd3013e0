//! Core types for lessonhub
//!
//! Domain types shared across all other crates: taxonomy, prompt records,
//! users and the constants that bound queries.

mod constants;
mod env_config;
mod error;
mod prompt;
mod stats;
mod taxonomy;
mod user;

pub use constants::*;
pub use env_config::{env_parse_clamped, env_parse_with_default};
pub use error::*;
pub use prompt::*;
pub use stats::*;
pub use taxonomy::*;
pub use user::*;
