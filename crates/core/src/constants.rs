//! Shared constants for lessonhub.
//!
//! Centralizes limits and labels used by storage, services and handlers.

/// Display name used when a prompt's category id does not resolve.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Display name used when a prompt's subcategory id does not resolve.
pub const UNKNOWN_SUB_CATEGORY: &str = "Unknown SubCategory";

/// Minimum prompt length in characters, after trimming.
pub const MIN_PROMPT_CHARS: usize = 5;

/// Number of categories reported in admin usage stats.
pub const TOP_CATEGORIES_LIMIT: usize = 5;

/// Default page size for the admin user listing.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound for any page size requested by a caller (DoS protection).
pub const MAX_PAGE_SIZE: usize = 100;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Default bound on one live lesson generation, in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 20;

/// Allowed range for a configured generation timeout.
pub const LLM_TIMEOUT_RANGE_SECS: (u64, u64) = (10, 30);

/// Default lifetime of an issued bearer token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Allowed range for a configured token lifetime, one hour to one year.
pub const TOKEN_TTL_RANGE_HOURS: (i64, i64) = (1, 8760);

/// Default categories and their subcategories, inserted by `seed`.
pub const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    ("Science", &["Space", "Biology", "Chemistry", "Physics"]),
    ("Mathematics", &["Algebra", "Geometry", "Calculus", "Statistics"]),
    ("Technology", &["Programming", "Web Development", "Artificial Intelligence", "Cybersecurity"]),
    ("History", &["Ancient History", "Modern History", "World Wars", "Medieval History"]),
    ("Languages", &["English", "Spanish", "French", "Hebrew"]),
];
