//! Request/query types (Deserialize)
//!
//! Fields are optional so a missing value surfaces as a field-level
//! validation error instead of a body rejection.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePromptRequest {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSubCategoryRequest {
    pub name: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub role: Option<String>,
}
