/// Get environment variable with CLERK_SYNC_ prefix, falling back to unprefixed version
///
/// This helper function checks for `CLERK_SYNC_{key}` first, then falls back to
/// `{key}` for compatibility with conventional environment variable names such
/// as `WEBHOOK_SECRET` or `PORT`.
///
/// # Examples
///
/// ```rust
/// use clerk_sync::utils::get_env_with_prefix;
///
/// // Checks CLERK_SYNC_PORT first, then PORT
/// let port = get_env_with_prefix("PORT");
///
/// // Checks CLERK_SYNC_WEBHOOK_SECRET first, then WEBHOOK_SECRET
/// let secret = get_env_with_prefix("WEBHOOK_SECRET");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("CLERK_SYNC_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_with_prefix() {
        // Test with CLERK_SYNC_ prefix
        std::env::set_var("CLERK_SYNC_TEST_VAR", "prefixed_value");
        assert_eq!(
            get_env_with_prefix("TEST_VAR"),
            Some("prefixed_value".to_string())
        );
        std::env::remove_var("CLERK_SYNC_TEST_VAR");

        // Test with unprefixed fallback
        std::env::set_var("FALLBACK_VAR", "unprefixed_value");
        assert_eq!(
            get_env_with_prefix("FALLBACK_VAR"),
            Some("unprefixed_value".to_string())
        );
        std::env::remove_var("FALLBACK_VAR");

        // Test non-existent variable
        assert_eq!(get_env_with_prefix("NON_EXISTENT_VAR"), None);
    }
}
