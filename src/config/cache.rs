//! Mutual-course cache key configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Key layout of the mutual-course cache.
#[derive(Debug, Clone, Deserialize)]
pub struct MutualCourseCacheConfig {
    /// Prefix of pair keys: `{prefix}:{first}:{second}`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Key of the site-wide point counter
    #[serde(default = "default_points_key")]
    pub points_key: String,
}

impl MutualCourseCacheConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_key(&self.key_prefix) {
            return Err(ValidationError::InvalidCacheKey("CACHE__KEY_PREFIX"));
        }
        if !is_valid_key(&self.points_key) {
            return Err(ValidationError::InvalidCacheKey("CACHE__POINTS_KEY"));
        }
        Ok(())
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

impl Default for MutualCourseCacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            points_key: default_points_key(),
        }
    }
}

fn default_key_prefix() -> String {
    crate::domain::user::DEFAULT_KEY_PREFIX.to_string()
}

fn default_points_key() -> String {
    "total_points".to_string()
}
