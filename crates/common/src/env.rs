//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Warn when the admin UI asset directory is missing; the API still serves.
pub async fn ensure_static_dir(static_dir: &str) -> bool {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static assets directory not found; admin UI routes will 404");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detects_missing_directory() {
        assert!(!ensure_static_dir("/definitely/not/here").await);
        let tmp = std::env::temp_dir();
        assert!(ensure_static_dir(tmp.to_str().unwrap()).await);
    }
}
