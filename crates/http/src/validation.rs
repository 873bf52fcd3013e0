//! Field-level request validation.
//!
//! Each `validate_*` turns a loosely-typed request into the service input,
//! or reports the first offending field.

use std::sync::LazyLock;

use lessonhub_core::{Role, MIN_PROMPT_CHARS};
use lessonhub_service::{NewPrompt, NewUser, UserListParams};
use regex::Regex;

use crate::api_error::ApiError;
use crate::query_types::{
    CreatePromptRequest, CreateSubCategoryRequest, LoginRequest, RegisterRequest, UserListQuery,
};

static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^05\d{8}$").unwrap());

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

fn required(value: Option<String>, field: &'static str, label: &str) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(field, format!("{label} is required"))),
    }
}

pub fn validate_register(req: RegisterRequest) -> Result<NewUser, ApiError> {
    let name = req.name.unwrap_or_default().trim().to_owned();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(ApiError::validation("name", "Name must be at least 2 characters"));
    }
    let phone = req.phone.unwrap_or_default().trim().to_owned();
    if !PHONE_REGEX.is_match(&phone) {
        return Err(ApiError::validation("phone", "Phone must be a valid mobile number (05xxxxxxxx)"));
    }
    let password = req.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::validation("password", "Password must be at least 6 characters"));
    }
    Ok(NewUser { name, phone, password })
}

pub fn validate_login(req: LoginRequest) -> Result<(String, String), ApiError> {
    let phone = required(req.phone, "phone", "Phone")?;
    let password = match req.password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::validation("password", "Password is required")),
    };
    Ok((phone, password))
}

pub fn validate_prompt(user_id: String, req: CreatePromptRequest) -> Result<NewPrompt, ApiError> {
    let category_id = required(req.category_id, "category_id", "Category")?;
    let sub_category_id = required(req.sub_category_id, "sub_category_id", "Subcategory")?;
    let prompt = req.prompt.unwrap_or_default().trim().to_owned();
    if prompt.chars().count() < MIN_PROMPT_CHARS {
        return Err(ApiError::validation("prompt", "Prompt must be at least 5 characters"));
    }
    Ok(NewPrompt { user_id, category_id, sub_category_id, prompt })
}

pub fn validate_category_name(name: Option<String>) -> Result<String, ApiError> {
    required(name, "name", "Name")
}

pub fn validate_sub_category(req: CreateSubCategoryRequest) -> Result<(String, String), ApiError> {
    let name = required(req.name, "name", "Name")?;
    let category_id = required(req.category_id, "category_id", "Category")?;
    Ok((name, category_id))
}

pub fn validate_user_list(query: UserListQuery) -> Result<UserListParams, ApiError> {
    let role = match query.role.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Role>()
                .map_err(|_| ApiError::validation("role", "Role must be 'user' or 'admin'"))?,
        ),
    };
    Ok(UserListParams { page: query.page, limit: query.limit, search: query.search, role })
}
