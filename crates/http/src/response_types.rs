//! Response types (Serialize)

use lessonhub_core::User;
use lessonhub_llm::{GeneratorStats, LlmStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub storage: &'static str,
    pub llm: LlmStatus,
    pub generator: GeneratorStats,
    pub uptime_secs: u64,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub deleted: bool,
    pub id: String,
}
