// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browser cookie store adapter.
//!
//! The session manager persists identity across restarts through
//! browser-level cookies. The browser side of that is platform code, so
//! it sits behind the [`CookieStore`] trait; the crate ships a
//! [`MemoryCookieJar`] used by tests and by hosts without a real cookie
//! facility.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// The cookie carrying the logged-in user's ID.
pub const USER_ID_COOKIE: &str = "user_id";

/// The anti-forgery token sent along with session revocation.
pub const CSRF_COOKIE: &str = "csrf_token";

/// Every cookie associated with a login session. Logout removes all of
/// them; removal of an absent cookie is not an error.
pub const SESSION_COOKIES: [&str; 5] = [
    USER_ID_COOKIE,
    "access_token",
    "refresh_token",
    CSRF_COOKIE,
    "auth_session",
];

/// Parameters for a cookie write.
#[derive(Debug, Clone)]
pub struct CookieDetails {
    pub name: String,
    pub value: String,
    /// Expiry instant; `None` lets the caller's policy fill in a default.
    pub expiration: Option<DateTime<Utc>>,
    /// Hidden from page scripts when the platform supports it.
    pub http_only: bool,
}

/// Synchronous browser-level cookie access.
pub trait CookieStore: Send + Sync {
    fn set(&self, cookie: CookieDetails);
    /// Returns the live value, or `None` when absent or expired.
    fn get(&self, name: &str) -> Option<String>;
    fn remove(&self, name: &str);
}

/// In-memory cookie jar honoring expiration on read.
#[derive(Default)]
pub struct MemoryCookieJar {
    cookies: DashMap<String, StoredCookie>,
}

struct StoredCookie {
    value: String,
    expiration: Option<DateTime<Utc>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieJar {
    fn set(&self, cookie: CookieDetails) {
        self.cookies.insert(
            cookie.name,
            StoredCookie {
                value: cookie.value,
                expiration: cookie.expiration,
            },
        );
    }

    fn get(&self, name: &str) -> Option<String> {
        let entry = self.cookies.get(name)?;
        if let Some(expiration) = entry.expiration {
            if expiration <= Utc::now() {
                drop(entry);
                self.cookies.remove(name);
                return None;
            }
        }
        Some(entry.value.clone())
    }

    fn remove(&self, name: &str) {
        self.cookies.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cookie(name: &str, value: &str, expiration: Option<DateTime<Utc>>) -> CookieDetails {
        CookieDetails {
            name: name.to_string(),
            value: value.to_string(),
            expiration,
            http_only: false,
        }
    }

    #[test]
    fn test_set_get_roundtrip() {
        let jar = MemoryCookieJar::new();
        jar.set(cookie("user_id", "u-123", None));
        assert_eq!(jar.get("user_id"), Some("u-123".to_string()));
    }

    #[test]
    fn test_expired_cookie_reads_as_absent() {
        let jar = MemoryCookieJar::new();
        jar.set(cookie(
            "user_id",
            "u-123",
            Some(Utc::now() - Duration::seconds(1)),
        ));
        assert_eq!(jar.get("user_id"), None);
        // Expired entries are dropped, not resurrected
        assert_eq!(jar.get("user_id"), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let jar = MemoryCookieJar::new();
        jar.set(cookie("csrf_token", "tok", None));
        jar.remove("csrf_token");
        jar.remove("csrf_token");
        jar.remove("never_existed");
        assert_eq!(jar.get("csrf_token"), None);
    }
}
