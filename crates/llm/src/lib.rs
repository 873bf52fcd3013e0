//! Lesson generation for lessonhub.
//!
//! `LlmClient` talks to an OpenAI-compatible chat-completion endpoint.
//! `ResponseGenerator` wraps any `LessonModel` and always yields lesson
//! text, falling back to a locally templated lesson when the model is
//! absent or fails.

mod ai_types;
mod client;
mod error;
mod fallback;
mod generator;
mod lesson;

pub use ai_types::{ChatRequest, Message, ResponseFormat};
pub use client::{truncate, LlmClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::LlmError;
pub use fallback::{fallback_lesson, FALLBACK_FOOTER};
pub use generator::{
    FallbackCause, Generation, GeneratorStats, LlmSettings, LlmStatus, ResponseGenerator,
};
pub use lesson::{LessonModel, LessonRequest};
