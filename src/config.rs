//! Runtime configuration loaded from environment variables.
//!
//! Every field has a baked-in default pointing at the production
//! endpoints; env vars exist so staging builds and tests can redirect
//! traffic without a code change.

use std::env;

/// Endpoint and cookie configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity provider base URL (login, register, logout, emails)
    pub auth_server_url: String,
    /// Account API base URL (JSON:API resources)
    pub account_server_url: String,
    /// Domain the login cookies are written under
    pub cookie_domain: String,
    /// Lifetime of the login cookie, in days
    pub cookie_ttl_days: i64,
    /// Theme restored when the account is cleared
    pub default_theme: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            auth_server_url: "https://auth.hub.example.com".to_string(),
            account_server_url: "https://account-api.hub.example.com".to_string(),
            cookie_domain: ".hub.example.com".to_string(),
            cookie_ttl_days: 90,
            default_theme: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset or unparsable values fall back
    /// to the production defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Self {
            auth_server_url: env::var("HUB_AUTH_SERVER_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.auth_server_url),
            account_server_url: env::var("HUB_ACCOUNT_SERVER_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.account_server_url),
            cookie_domain: env::var("HUB_COOKIE_DOMAIN").unwrap_or(defaults.cookie_domain),
            cookie_ttl_days: env::var("HUB_COOKIE_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cookie_ttl_days),
            default_theme: env::var("HUB_DEFAULT_THEME").unwrap_or(defaults.default_theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_production() {
        let config = Config::default();
        assert!(config.auth_server_url.starts_with("https://"));
        assert!(config.account_server_url.starts_with("https://"));
        assert_eq!(config.cookie_ttl_days, 90);
        assert_eq!(config.default_theme, "default");
    }

    #[test]
    fn test_env_override_trims_trailing_slash() {
        env::set_var("HUB_AUTH_SERVER_URL", "https://auth.staging.example.com/");
        let config = Config::from_env();
        assert_eq!(config.auth_server_url, "https://auth.staging.example.com");
        env::remove_var("HUB_AUTH_SERVER_URL");
    }
}
