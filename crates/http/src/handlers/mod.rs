#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod admin;
pub mod auth;
pub mod categories;
pub mod prompts;
pub mod users;
