//! Router-level tests against the in-memory backend.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use lessonhub_http::{create_router, AppState};
use lessonhub_llm::ResponseGenerator;
use lessonhub_service::{AuthSettings, NewUser};
use lessonhub_storage::{MemoryStorage, StorageBackend};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    memory: MemoryStorage,
}

fn test_app() -> TestApp {
    let memory = MemoryStorage::new();
    let storage = Arc::new(StorageBackend::from(memory.clone()));
    let state = Arc::new(AppState::new(
        storage,
        Arc::new(ResponseGenerator::fallback_only()),
        AuthSettings { token_ttl_hours: 1, bcrypt_cost: 4 },
    ));
    TestApp { router: create_router(Arc::clone(&state)), state, memory }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        match body {
            Some(body) => {
                self.send_raw(method, uri, token, Some("application/json"), body.to_string()).await
            },
            None => self.send_raw(method, uri, token, None, String::new()).await,
        }
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn register(&self, phone: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"name": "Dana", "phone": phone, "password": "secret1"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_owned()
    }

    async fn admin_token(&self) -> String {
        self.state
            .user_service
            .create_admin(NewUser {
                name: "Admin".to_owned(),
                phone: "0509999999".to_owned(),
                password: "adminpass".to_owned(),
            })
            .await
            .unwrap();
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"phone": "0509999999", "password": "adminpass"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_owned()
    }

    /// Seeds Technology/Programming and returns their ids.
    async fn technology_programming(&self) -> (String, String) {
        let taxonomy = &self.state.taxonomy_service;
        let category = taxonomy.create_category("Technology").await.unwrap();
        let sub = taxonomy.create_sub_category("Programming", &category.id).await.unwrap();
        (category.id, sub.id)
    }
}

#[tokio::test]
async fn health_endpoints_report_fallback_generator() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["llm"], "not_configured");
    assert_eq!(body["generator"]["fallback_count"], 0);
}

#[tokio::test]
async fn health_is_503_when_store_is_down() {
    let app = test_app();
    app.memory.set_unavailable(true);
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn register_validation_reports_field() {
    let app = test_app();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Dana", "phone": "12345", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "phone");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn auth_flow_register_profile_logout() {
    let app = test_app();
    let token = app.register("0501234567").await;

    let (status, body) = app.send(Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["phone"], "0501234567");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    let (status, _) = app.send(Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_login_is_401() {
    let app = test_app();
    app.register("0501234567").await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"phone": "0501234567", "password": "nope-nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_phone_registration_is_400() {
    let app = test_app();
    app.register("0501234567").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Noa", "phone": "0501234567", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "phone");
}

#[tokio::test]
async fn prompt_requires_token() {
    let app = test_app();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/prompts",
            None,
            Some(json!({"category_id": "c", "sub_category_id": "s", "prompt": "What is a variable?"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn submit_prompt_without_key_returns_fallback_lesson() {
    let app = test_app();
    let token = app.register("0501234567").await;
    let (category_id, sub_category_id) = app.technology_programming().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/prompts",
            Some(&token),
            Some(json!({
                "category_id": category_id,
                "sub_category_id": sub_category_id,
                "prompt": "What is a variable?"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["category_name"], "Technology");
    assert_eq!(body["sub_category_name"], "Programming");
    assert_eq!(body["prompt"], "What is a variable?");
    let response = body["response"].as_str().unwrap();
    for marker in ["Introduction:", "Key Points:", "Example:", "Exercise:"] {
        assert!(response.contains(marker), "missing {marker}");
    }
    assert!(response.contains("Technology") && response.contains("Programming"));

    let (_, health) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(health["generator"]["fallback_count"], 1);
    assert_eq!(health["generator"]["last_fallback_cause"], "not_configured");
}

#[tokio::test]
async fn unknown_category_uses_sentinel_name() {
    let app = test_app();
    let token = app.register("0501234567").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/prompts",
            Some(&token),
            Some(json!({"category_id": "ghost", "sub_category_id": "ghost", "prompt": "Tell me more"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["category_name"], "Unknown Category");
    assert_eq!(body["sub_category_name"], "Unknown SubCategory");
}

#[tokio::test]
async fn short_prompt_is_rejected() {
    let app = test_app();
    let token = app.register("0501234567").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/prompts",
            Some(&token),
            Some(json!({"category_id": "c", "sub_category_id": "s", "prompt": "  hi  "})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "prompt");
}

#[tokio::test]
async fn history_lists_own_prompts_newest_first() {
    let app = test_app();
    let token = app.register("0501234567").await;
    let other = app.register("0507654321").await;
    let (category_id, sub_category_id) = app.technology_programming().await;

    let mut ids = Vec::new();
    for question in ["First question", "Second question", "Third question"] {
        let (_, body) = app
            .send(
                Method::POST,
                "/api/prompts",
                Some(&token),
                Some(json!({
                    "category_id": category_id,
                    "sub_category_id": sub_category_id,
                    "prompt": question
                })),
            )
            .await;
        ids.push(body["id"].as_str().unwrap().to_owned());
    }

    let (status, body) = app.send(Method::GET, "/api/prompts/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap()).collect();
    ids.reverse();
    assert_eq!(listed, ids);

    let (_, body) = app.send(Method::GET, "/api/prompts/me", Some(&other), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn storage_failure_during_submit_is_opaque_500() {
    let app = test_app();
    let token = app.register("0501234567").await;
    app.memory.set_unavailable(true);
    let (status, body) = app
        .send(
            Method::POST,
            "/api/prompts",
            Some(&token),
            Some(json!({"category_id": "c", "sub_category_id": "s", "prompt": "What is a variable?"})),
        )
        .await;
    // The token lookup itself hits the store first.
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let app = test_app();
    let token = app.register("0501234567").await;
    for (method, uri) in [
        (Method::GET, "/api/admin/stats"),
        (Method::GET, "/api/admin/users"),
        (Method::GET, "/api/users"),
        (Method::DELETE, "/api/admin/users/x"),
        (Method::GET, "/api/prompts/user/x"),
    ] {
        let (status, _) = app.send(method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
    let (status, _) = app
        .send(Method::POST, "/api/categories", Some(&token), Some(json!({"name": "Art"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_taxonomy() {
    let app = test_app();
    let admin = app.admin_token().await;

    let (status, category) = app
        .send(Method::POST, "/api/categories", Some(&admin), Some(json!({"name": "Art"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().unwrap().to_owned();

    let (status, _) = app
        .send(Method::POST, "/api/categories", Some(&admin), Some(json!({"name": "Art"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/categories/sub",
            Some(&admin),
            Some(json!({"name": "Painting", "category_id": category_id})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/categories/sub",
            Some(&admin),
            Some(json!({"name": "Painting", "category_id": "missing"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, subs) = app
        .send(Method::GET, &format!("/api/categories/{category_id}/subcategories"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs[0]["name"], "Painting");

    let (_, categories) = app.send(Method::GET, "/api/categories", None, None).await;
    assert_eq!(categories.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_stats_and_user_management() {
    let app = test_app();
    let admin = app.admin_token().await;
    let token = app.register("0501234567").await;
    let (category_id, sub_category_id) = app.technology_programming().await;
    app.send(
        Method::POST,
        "/api/prompts",
        Some(&token),
        Some(json!({
            "category_id": category_id,
            "sub_category_id": sub_category_id,
            "prompt": "What is a variable?"
        })),
    )
    .await;

    let (status, stats) = app.send(Method::GET, "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_users"], 2);
    assert_eq!(stats["total_prompts"], 1);
    assert_eq!(stats["top_categories"][0]["name"], "Technology");
    assert_eq!(stats["top_categories"][0]["count"], 1);

    let (status, page) =
        app.send(Method::GET, "/api/admin/users?page=1&limit=1&role=user", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"], json!({"page": 1, "limit": 1, "total": 1, "pages": 1}));
    let user_id = page["users"][0]["id"].as_str().unwrap().to_owned();

    let (status, prompts) = app
        .send(Method::GET, &format!("/api/prompts/user/{user_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prompts.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/admin/users/{user_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": true, "id": user_id}));

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/admin/users/{user_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting the user revoked their token and removed their prompts.
    let (status, _) = app.send(Method::GET, "/api/prompts/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, stats) = app.send(Method::GET, "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(stats["total_prompts"], 0);
}

#[tokio::test]
async fn admin_user_list_rejects_unknown_role() {
    let app = test_app();
    let admin = app.admin_token().await;
    let (status, body) =
        app.send(Method::GET, "/api/admin/users?role=root", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "role");
}

#[tokio::test]
async fn version_reports_crate_version() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/api/version", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn users_route_lists_accounts_for_admins() {
    let app = test_app();
    let admin = app.admin_token().await;
    app.register("0501234567").await;
    let (status, page) = app.send(Method::GET, "/api/users?role=user", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["users"][0]["phone"], "0501234567");
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = test_app();
    let token = app.register("0501234567").await;

    let cases = [
        (Some("application/json"), r#"{"category_id": "c", "sub_category_id": "s", "prompt": 5}"#),
        (Some("application/json"), "{not json"),
        (None, r#"{"category_id": "c", "sub_category_id": "s", "prompt": "hello"}"#),
    ];
    for (content_type, body) in cases {
        let (status, value) = app
            .send_raw(Method::POST, "/api/prompts", Some(&token), content_type, body.to_owned())
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(value["error"].is_string(), "{value}");
    }

    let (status, value) = app
        .send_raw(Method::POST, "/api/auth/register", None, Some("application/json"), "42".to_owned())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn bad_query_string_gets_json_error() {
    let app = test_app();
    let admin = app.admin_token().await;
    let (status, body) =
        app.send(Method::GET, "/api/admin/users?page=abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
