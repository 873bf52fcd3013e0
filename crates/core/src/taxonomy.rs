//! Category / SubCategory classification tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{UNKNOWN_CATEGORY, UNKNOWN_SUB_CATEGORY};

/// Top-level topic a prompt is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    #[must_use]
    pub const fn new(id: String, name: String, created_at: DateTime<Utc>) -> Self {
        Self { id, name, created_at }
    }
}

/// Second-level topic. `(name, category_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
}

impl SubCategory {
    #[must_use]
    pub const fn new(
        id: String,
        name: String,
        category_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { id, name, category_id, created_at }
    }
}

/// Display names for a (category, subcategory) pair.
///
/// Unresolved ids degrade to sentinel names instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNames {
    pub category_name: String,
    pub sub_category_name: String,
}

impl TaxonomyNames {
    #[must_use]
    pub fn resolve(category_name: Option<String>, sub_category_name: Option<String>) -> Self {
        Self {
            category_name: category_name.unwrap_or_else(|| UNKNOWN_CATEGORY.to_owned()),
            sub_category_name: sub_category_name.unwrap_or_else(|| UNKNOWN_SUB_CATEGORY.to_owned()),
        }
    }

    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        self.category_name != UNKNOWN_CATEGORY && self.sub_category_name != UNKNOWN_SUB_CATEGORY
    }
}
