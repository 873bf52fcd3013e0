//! Prompt records: one per submitted question, write-once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::taxonomy::TaxonomyNames;

/// A persisted question and the lesson generated for it.
///
/// `category_id` and `sub_category_id` are not enforced references: they
/// may point at taxonomy entries that do not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub sub_category_id: String,
    pub prompt: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl PromptRecord {
    #[must_use]
    pub const fn new(
        id: String,
        user_id: String,
        category_id: String,
        sub_category_id: String,
        prompt: String,
        response: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { id, user_id, category_id, sub_category_id, prompt, response, created_at }
    }
}

/// A prompt record enriched with resolved taxonomy names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptView {
    #[serde(flatten)]
    pub record: PromptRecord,
    pub category_name: String,
    pub sub_category_name: String,
}

impl PromptView {
    #[must_use]
    pub fn new(record: PromptRecord, names: TaxonomyNames) -> Self {
        Self {
            record,
            category_name: names.category_name,
            sub_category_name: names.sub_category_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_serializes_flat() {
        let record = PromptRecord::new(
            "p1".to_owned(),
            "u1".to_owned(),
            "c1".to_owned(),
            "s1".to_owned(),
            "What is a variable?".to_owned(),
            "Introduction: ...".to_owned(),
            Utc::now(),
        );
        let view = PromptView::new(record, TaxonomyNames::resolve(Some("Technology".to_owned()), None));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["category_id"], "c1");
        assert_eq!(json["category_name"], "Technology");
        assert_eq!(json["sub_category_name"], "Unknown SubCategory");
        assert!(json.get("record").is_none());
    }
}
