use serde::{Deserialize, Serialize};

/// Prompt count for one category, used by the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub category_id: String,
    pub name: String,
    pub count: u64,
}

/// Aggregate platform counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_categories: u64,
    pub total_sub_categories: u64,
    pub total_prompts: u64,
    pub top_categories: Vec<CategoryUsage>,
}
