use std::sync::Arc;

use anyhow::{bail, Result};
use lessonhub_http::api_error::ApiError;
use lessonhub_http::{validate_register, RegisterRequest};
use lessonhub_service::{AuthSettings, NewUser, UserService};
use lessonhub_storage::StorageBackend;

/// Admin credentials from the command line or environment.
pub(crate) struct AdminAccount {
    pub name: String,
    pub phone: String,
    pub password: String,
}

impl AdminAccount {
    /// Apply the same rules as `POST /api/auth/register`.
    pub(crate) fn validate(self) -> Result<NewUser> {
        let request = RegisterRequest {
            name: Some(self.name),
            phone: Some(self.phone),
            password: Some(self.password),
        };
        match validate_register(request) {
            Ok(input) => Ok(input),
            Err(ApiError::Validation { field, message }) => bail!("invalid {field}: {message}"),
            Err(other) => bail!("invalid admin details: {other:?}"),
        }
    }
}

pub(crate) async fn create_admin(storage: Arc<StorageBackend>, account: AdminAccount) -> Result<()> {
    let input = account.validate()?;
    let users = UserService::new(storage, AuthSettings::from_env());
    let admin = users.create_admin(input).await?;
    println!("{}", serde_json::to_string_pretty(&admin)?);
    Ok(())
}
