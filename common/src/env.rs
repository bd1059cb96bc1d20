use anyhow::{Context, Result};

/// Reads an optional numeric environment variable. A set but unparsable value is an error.
pub fn get_env_usize(key: &str) -> Result<Option<usize>> {
    std::env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a valid number, got {:?}", key, v))
        })
        .transpose()
}
