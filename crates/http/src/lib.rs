//! HTTP API server for lessonhub.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod auth;
mod extract;
mod handlers;
mod query_types;
mod response_types;
mod validation;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{delete, get, post},
    Json, Router,
};
use lessonhub_llm::ResponseGenerator;
use lessonhub_service::{AdminService, AuthSettings, PromptService, TaxonomyService, UserService};
use lessonhub_storage::StorageBackend;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::{AdminUser, AuthUser};
pub use query_types::RegisterRequest;
pub use response_types::{HealthResponse, VersionResponse};
pub use validation::validate_register;

/// Local frontend dev servers allowed alongside `FRONTEND_URL`.
const DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Shared application state for all HTTP handlers.
///
/// Wrapped in `Arc` for thread-safe sharing across handlers.
pub struct AppState {
    /// Prompt pipeline: taxonomy lookup, generation, persistence
    pub prompt_service: Arc<PromptService>,
    /// Categories and subcategories
    pub taxonomy_service: Arc<TaxonomyService>,
    /// Accounts and bearer tokens
    pub user_service: Arc<UserService>,
    /// Stats and storage health
    pub admin_service: Arc<AdminService>,
    /// Lesson generator, shared with `prompt_service`
    pub generator: Arc<ResponseGenerator>,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(
        storage: Arc<StorageBackend>,
        generator: Arc<ResponseGenerator>,
        auth: AuthSettings,
    ) -> Self {
        Self {
            prompt_service: Arc::new(PromptService::new(
                Arc::clone(&storage),
                Arc::clone(&generator),
            )),
            taxonomy_service: Arc::new(TaxonomyService::new(Arc::clone(&storage))),
            user_service: Arc::new(UserService::new(Arc::clone(&storage), auth)),
            admin_service: Arc::new(AdminService::new(storage)),
            generator,
            started_at: Instant::now(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(api_health))
        .route("/api/version", get(version))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route("/api/users", get(handlers::admin::list_users))
        .route("/api/users/me", get(handlers::users::me))
        .route("/api/users/{id}", get(handlers::users::get_user))
        .route(
            "/api/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route("/api/categories/sub", post(handlers::categories::create_sub_category))
        .route(
            "/api/categories/{id}/subcategories",
            get(handlers::categories::list_sub_categories),
        )
        .route("/api/prompts", post(handlers::prompts::create_prompt))
        .route("/api/prompts/me", get(handlers::prompts::my_prompts))
        .route("/api/prompts/user/{user_id}", get(handlers::prompts::user_prompts))
        .route("/api/admin/stats", get(handlers::admin::stats))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/users/{id}", delete(handlers::admin::delete_user))
        .layer(cors_layer(std::env::var("FRONTEND_URL").ok().as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when no frontend URL is configured, otherwise that URL plus
/// the local dev servers.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    let Some(frontend_url) = frontend_url.filter(|u| !u.trim().is_empty()) else {
        return base.allow_origin(Any);
    };
    let origins: Vec<HeaderValue> = DEV_ORIGINS
        .iter()
        .copied()
        .chain(std::iter::once(frontend_url.trim_end_matches('/')))
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = o, error = %e, "ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> &'static str {
    "ok"
}

async fn api_health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let storage_ok = state.admin_service.storage_healthy().await;
    let status = if storage_ok { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    let body = HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" },
        database: if storage_ok { "connected" } else { "disconnected" },
        storage: state.admin_service.storage_kind(),
        llm: state.generator.status(),
        generator: state.generator.stats(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
    };
    (status, Json(body))
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}


#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "test code")]

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    async fn allowed_origin(frontend_url: Option<&str>, origin: &str) -> Option<String> {
        let router = Router::new().route("/health", get(health)).layer(cors_layer(frontend_url));
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_owned())
    }

    #[tokio::test]
    async fn cors_allows_any_origin_without_frontend_url() {
        assert_eq!(allowed_origin(None, "https://anywhere.test").await.as_deref(), Some("*"));
        assert_eq!(allowed_origin(Some("  "), "https://anywhere.test").await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn cors_allows_frontend_and_dev_origins() {
        let frontend = Some("https://app.lessonhub.test");
        assert_eq!(
            allowed_origin(frontend, "https://app.lessonhub.test").await.as_deref(),
            Some("https://app.lessonhub.test")
        );
        assert_eq!(
            allowed_origin(frontend, "http://localhost:5173").await.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(allowed_origin(frontend, "https://evil.test").await, None);
    }

    #[tokio::test]
    async fn cors_frontend_url_trailing_slash_is_ignored() {
        assert_eq!(
            allowed_origin(Some("https://app.lessonhub.test/"), "https://app.lessonhub.test")
                .await
                .as_deref(),
            Some("https://app.lessonhub.test")
        );
    }

    #[tokio::test]
    async fn cors_preflight_allows_auth_header() {
        let router = Router::new()
            .route("/api/prompts", post(health))
            .layer(cors_layer(Some("https://app.lessonhub.test")));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/prompts")
            .header(header::ORIGIN, "https://app.lessonhub.test")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let allowed = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .unwrap()
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"), "{allowed}");
    }
}
