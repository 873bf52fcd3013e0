//! The lesson-model seam and the prompt sent to live models.

use async_trait::async_trait;

use crate::ai_types::{ChatRequest, Message};
use crate::client::LlmClient;
use crate::error::LlmError;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

/// Inputs for one lesson: the learner's question and the resolved topic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonRequest<'a> {
    pub prompt: &'a str,
    pub category_name: &'a str,
    pub sub_category_name: &'a str,
}

impl LessonRequest<'_> {
    /// System instruction framing the model as an educator for the topic.
    #[must_use]
    pub fn system_instruction(&self) -> String {
        format!(
            "You are an expert educator specializing in {category}. \
             Write a clear, beginner-friendly lesson about {sub} within {category}.\n\n\
             Structure the lesson with these headings, in order:\n\
             Introduction: two or three sentences explaining the concept.\n\
             Key Points: three to five bullet points.\n\
             Example: a practical, real-world application.\n\
             Exercise: something the learner can try on their own.",
            category = self.category_name,
            sub = self.sub_category_name,
        )
    }

    /// User message carrying the learner's question verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!(
            "Topic: {} > {}\nQuestion/Task: {}",
            self.category_name, self.sub_category_name, self.prompt
        )
    }
}

/// Anything able to turn a lesson request into lesson text.
///
/// `ResponseGenerator` holds one of these behind an `Arc`, so tests can
/// swap in a scripted model.
#[async_trait]
pub trait LessonModel: Send + Sync {
    async fn complete_lesson(&self, request: &LessonRequest<'_>) -> Result<String, LlmError>;
}

#[async_trait]
impl LessonModel for LlmClient {
    async fn complete_lesson(&self, request: &LessonRequest<'_>) -> Result<String, LlmError> {
        let chat = ChatRequest {
            model: self.model().to_owned(),
            messages: vec![
                Message::system(request.system_instruction()),
                Message::user(request.user_message()),
            ],
            response_format: None,
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
        };
        self.chat_completion(&chat).await
    }
}
