//! Service layer for lessonhub
//!
//! Centralizes business logic between HTTP/CLI handlers and storage/llm.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod admin_service;
mod error;
mod prompt_service;
mod taxonomy_service;
mod user_service;

pub use admin_service::AdminService;
pub use error::ServiceError;
pub use prompt_service::{NewPrompt, PromptService};
pub use taxonomy_service::{SeedReport, TaxonomyService};
pub use user_service::{
    AuthSession, AuthSettings, NewUser, Pagination, UserListParams, UserPage, UserService,
};

#[cfg(test)]
mod test_support;
