//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Parse an environment variable and clamp it into `[min, max]`.
///
/// A clamped value is logged so a misconfigured deployment is visible.
pub fn env_parse_clamped<T>(var: &str, default: T, min: T, max: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd + Copy,
{
    let raw = env_parse_with_default(var, default);
    let clamped = if raw < min {
        min
    } else if raw > max {
        max
    } else {
        raw
    };
    if clamped != raw {
        tracing::warn!(var, original = %raw, clamped = %clamped, "env var clamped to allowed range");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(var: &str, value: &str) {
        // SAFETY: each test uses a unique variable name, nothing else reads it.
        unsafe { std::env::set_var(var, value) };
    }

    fn unset(var: &str) {
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "TEST_LESSONHUB_ENV_PARSE_VALID_4127";
        set(var_name, "42");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "TEST_LESSONHUB_ENV_PARSE_INVALID_4128";
        set(var_name, "banana");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "TEST_LESSONHUB_ENV_PARSE_MISSING_4129";
        unset(var_name);
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_parse_clamped_above_max() {
        let var_name = "TEST_LESSONHUB_ENV_CLAMP_HIGH_4130";
        set(var_name, "90");
        let result: u64 = env_parse_clamped(var_name, 20, 10, 30);
        assert_eq!(result, 30);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_clamped_below_min() {
        let var_name = "TEST_LESSONHUB_ENV_CLAMP_LOW_4131";
        set(var_name, "1");
        let result: u64 = env_parse_clamped(var_name, 20, 10, 30);
        assert_eq!(result, 10);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_clamped_in_range() {
        let var_name = "TEST_LESSONHUB_ENV_CLAMP_OK_4132";
        set(var_name, "15");
        let result: u64 = env_parse_clamped(var_name, 20, 10, 30);
        assert_eq!(result, 15);
        unset(var_name);
    }
}
