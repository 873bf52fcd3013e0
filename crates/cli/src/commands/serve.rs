use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use lessonhub_http::{create_router, AppState};
use lessonhub_llm::{LlmSettings, ResponseGenerator};
use lessonhub_service::{AuthSettings, ServiceError, UserService};
use lessonhub_storage::StorageBackend;

use super::admin::AdminAccount;

const TOKEN_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Spawns a background task that drops expired bearer tokens every hour.
/// Errors are logged and retried on the next tick.
fn start_token_purge(users: Arc<UserService>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_PURGE_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = users.purge_expired_tokens().await {
                tracing::warn!(error = %e, "token purge failed");
            }
        }
    });
}

/// Seed the default taxonomy into an in-memory store and create the
/// configured admin. Safe to run against a store that already has both.
async fn bootstrap(state: &AppState, admin: Option<AdminAccount>) -> Result<()> {
    if state.admin_service.storage_kind() == "memory" {
        let report = state.taxonomy_service.seed_defaults().await?;
        tracing::info!(
            categories = report.categories_created,
            sub_categories = report.sub_categories_created,
            "in-memory taxonomy seeded"
        );
    }
    let Some(account) = admin else {
        return Ok(());
    };
    let input = account.validate()?;
    match state.user_service.create_admin(input).await {
        Ok(user) => tracing::info!(user_id = %user.id, "admin account created"),
        Err(ServiceError::InvalidField { field: "phone", .. }) => {
            tracing::info!("admin phone already registered, skipping admin creation");
        },
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub(crate) async fn run(
    storage: Arc<StorageBackend>,
    port: u16,
    host: String,
    admin: Option<AdminAccount>,
) -> Result<()> {
    let generator = Arc::new(ResponseGenerator::from_settings(LlmSettings::from_env()));
    let state = Arc::new(AppState::new(storage, generator, AuthSettings::from_env()));
    bootstrap(&state, admin).await?;
    start_token_purge(Arc::clone(&state.user_service));

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "test code")]

    use super::*;

    fn memory_state() -> AppState {
        AppState::new(
            Arc::new(StorageBackend::new_memory()),
            Arc::new(ResponseGenerator::fallback_only()),
            AuthSettings { token_ttl_hours: 1, bcrypt_cost: 4 },
        )
    }

    fn account(phone: &str) -> AdminAccount {
        AdminAccount {
            name: "Dana Levi".to_owned(),
            phone: phone.to_owned(),
            password: "secret1".to_owned(),
        }
    }

    #[tokio::test]
    async fn memory_store_gets_taxonomy_and_admin() {
        let state = memory_state();
        bootstrap(&state, Some(account("0501234567"))).await.unwrap();

        assert_eq!(state.taxonomy_service.list_categories().await.unwrap().len(), 5);
        let session = state.user_service.login("0501234567", "secret1").await.unwrap();
        assert_eq!(session.user.role.as_str(), "admin");
    }

    #[tokio::test]
    async fn bootstrap_is_repeatable() {
        let state = memory_state();
        bootstrap(&state, Some(account("0501234567"))).await.unwrap();
        bootstrap(&state, Some(account("0501234567"))).await.unwrap();

        assert_eq!(state.taxonomy_service.list_categories().await.unwrap().len(), 5);
        let stats = state.admin_service.stats().await.unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_sub_categories, 20);
    }

    #[tokio::test]
    async fn bootstrap_without_admin_only_seeds() {
        let state = memory_state();
        bootstrap(&state, None).await.unwrap();
        assert_eq!(state.admin_service.stats().await.unwrap().total_users, 0);
        assert_eq!(state.taxonomy_service.list_categories().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn invalid_admin_phone_is_rejected() {
        let state = memory_state();
        let err = bootstrap(&state, Some(account("12345"))).await.unwrap_err();
        assert!(err.to_string().contains("invalid phone"), "{err}");
    }
}
