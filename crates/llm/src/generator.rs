//! Live-or-fallback lesson generation.
//!
//! The generator never fails: whatever happens to the live call, the caller
//! gets lesson text back. The outcome is reported as a [`Generation`] so
//! callers and tests can tell which path produced it.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lessonhub_core::{
    env_parse_clamped, DEFAULT_LLM_TIMEOUT_SECS, LLM_TIMEOUT_RANGE_SECS,
};
use serde::Serialize;

use crate::client::{LlmClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::LlmError;
use crate::fallback::fallback_lesson;
use crate::lesson::{LessonModel, LessonRequest};

/// Why a lesson came from the offline template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// No API key configured.
    NotConfigured,
    /// The live call exceeded the generator timeout.
    Timeout,
    /// The model answered with blank text.
    EmptyResponse,
    /// Credentials, endpoint or model are wrong (401/403/404, client build).
    Misconfigured(String),
    /// Any other upstream failure.
    Upstream(String),
}

impl FallbackCause {
    /// Stable label, safe to show on the health endpoint.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Timeout => "timeout",
            Self::EmptyResponse => "empty_response",
            Self::Misconfigured(_) => "misconfigured",
            Self::Upstream(_) => "upstream_error",
        }
    }

    const fn code(&self) -> u8 {
        match self {
            Self::NotConfigured => 1,
            Self::Timeout => 2,
            Self::EmptyResponse => 3,
            Self::Misconfigured(_) => 4,
            Self::Upstream(_) => 5,
        }
    }

    const fn label_for_code(code: u8) -> Option<&'static str> {
        match code {
            1 => Some("not_configured"),
            2 => Some("timeout"),
            3 => Some("empty_response"),
            4 => Some("misconfigured"),
            5 => Some("upstream_error"),
            _ => None,
        }
    }

    fn from_error(err: &LlmError) -> Self {
        if err.is_misconfiguration() {
            Self::Misconfigured(err.to_string())
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Live(String),
    Fallback { text: String, cause: FallbackCause },
}

impl Generation {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Live(text) | Self::Fallback { text, .. } => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Live(text) | Self::Fallback { text, .. } => text,
        }
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

/// Health of the live model as seen by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmStatus {
    Configured,
    NotConfigured,
    Misconfigured,
}

/// Counters exposed on the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
    pub live_count: u64,
    pub fallback_count: u64,
    pub last_fallback_cause: Option<&'static str>,
}

/// Live model settings, usually read from the environment.
#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmSettings {
    /// `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `LESSONHUB_MODEL` and
    /// `LESSONHUB_LLM_TIMEOUT_SECS` (clamped to 10..=30).
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let model = std::env::var("LESSONHUB_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let (min, max) = LLM_TIMEOUT_RANGE_SECS;
        let secs =
            env_parse_clamped("LESSONHUB_LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS, min, max);
        Self { api_key, base_url, model, timeout: Duration::from_secs(secs) }
    }
}

/// Produces lesson text for a prompt, live when possible.
pub struct ResponseGenerator {
    model: Option<Arc<dyn LessonModel>>,
    timeout: Duration,
    live_count: AtomicU64,
    fallback_count: AtomicU64,
    last_cause: AtomicU8,
    misconfigured: AtomicBool,
}

impl std::fmt::Debug for ResponseGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseGenerator")
            .field("live", &self.model.is_some())
            .field("timeout", &self.timeout)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ResponseGenerator {
    #[must_use]
    pub fn new(model: Arc<dyn LessonModel>, timeout: Duration) -> Self {
        Self::build(Some(model), timeout)
    }

    /// A generator that always uses the offline template.
    #[must_use]
    pub fn fallback_only() -> Self {
        Self::build(None, Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS))
    }

    /// Build from settings. A missing key yields a fallback-only generator;
    /// a client that cannot be built is reported as misconfiguration.
    #[must_use]
    pub fn from_settings(settings: LlmSettings) -> Self {
        let Some(api_key) = settings.api_key else {
            tracing::warn!("OPENAI_API_KEY not set, lessons will use the offline template");
            return Self::fallback_only();
        };
        match LlmClient::new(api_key, settings.base_url) {
            Ok(client) => {
                let client = client.with_model(settings.model);
                tracing::info!(
                    model = client.model(),
                    base_url = client.base_url(),
                    timeout_secs = settings.timeout.as_secs(),
                    "live lesson model configured"
                );
                Self::new(Arc::new(client), settings.timeout)
            },
            Err(e) => {
                tracing::error!(alert = "llm_misconfigured", error = %e, "failed to build LLM client");
                let generator = Self::fallback_only();
                generator.misconfigured.store(true, Ordering::Relaxed);
                generator
            },
        }
    }

    fn build(model: Option<Arc<dyn LessonModel>>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            live_count: AtomicU64::new(0),
            fallback_count: AtomicU64::new(0),
            last_cause: AtomicU8::new(0),
            misconfigured: AtomicBool::new(false),
        }
    }

    /// Generate lesson text. Never fails.
    pub async fn generate(
        &self,
        prompt: &str,
        category_name: &str,
        sub_category_name: &str,
    ) -> Generation {
        let request = LessonRequest { prompt, category_name, sub_category_name };
        let outcome = match &self.model {
            Some(model) => self.call_model(model.as_ref(), &request).await,
            None => Err(FallbackCause::NotConfigured),
        };

        match outcome {
            Ok(text) => {
                self.live_count.fetch_add(1, Ordering::Relaxed);
                self.misconfigured.store(false, Ordering::Relaxed);
                Generation::Live(text)
            },
            Err(cause) => {
                self.record_fallback(&cause);
                let text = fallback_lesson(prompt, category_name, sub_category_name);
                Generation::Fallback { text, cause }
            },
        }
    }

    async fn call_model(
        &self,
        model: &dyn LessonModel,
        request: &LessonRequest<'_>,
    ) -> Result<String, FallbackCause> {
        match tokio::time::timeout(self.timeout, model.complete_lesson(request)).await {
            Err(_) => Err(FallbackCause::Timeout),
            Ok(Err(e)) => Err(FallbackCause::from_error(&e)),
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    Err(FallbackCause::EmptyResponse)
                } else {
                    Ok(text.to_owned())
                }
            },
        }
    }

    fn record_fallback(&self, cause: &FallbackCause) {
        self.fallback_count.fetch_add(1, Ordering::Relaxed);
        self.last_cause.store(cause.code(), Ordering::Relaxed);
        match cause {
            FallbackCause::NotConfigured => {
                tracing::debug!("no live model, using offline lesson");
            },
            FallbackCause::Misconfigured(detail) => {
                self.misconfigured.store(true, Ordering::Relaxed);
                tracing::error!(
                    alert = "llm_misconfigured",
                    error = %detail,
                    "live lesson model rejected the request, using offline lesson"
                );
            },
            FallbackCause::Upstream(detail) => {
                tracing::warn!(cause = cause.label(), error = %detail, "live lesson failed, using offline lesson");
            },
            FallbackCause::Timeout | FallbackCause::EmptyResponse => {
                tracing::warn!(cause = cause.label(), timeout = ?self.timeout, "live lesson failed, using offline lesson");
            },
        }
    }

    #[must_use]
    pub fn stats(&self) -> GeneratorStats {
        GeneratorStats {
            live_count: self.live_count.load(Ordering::Relaxed),
            fallback_count: self.fallback_count.load(Ordering::Relaxed),
            last_fallback_cause: FallbackCause::label_for_code(
                self.last_cause.load(Ordering::Relaxed),
            ),
        }
    }

    #[must_use]
    pub fn status(&self) -> LlmStatus {
        if self.misconfigured.load(Ordering::Relaxed) {
            LlmStatus::Misconfigured
        } else if self.model.is_none() {
            LlmStatus::NotConfigured
        } else {
            LlmStatus::Configured
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}
