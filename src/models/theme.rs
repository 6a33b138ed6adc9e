//! Cached theme stylesheet.

use chrono::{DateTime, Duration, Utc};

/// How long a fetched theme is servable without a refetch.
const THEME_MAX_AGE_HOURS: i64 = 24;

/// A fetched theme stylesheet with its retrieval time.
#[derive(Debug, Clone)]
pub struct ThemeData {
    pub name: String,
    pub css: String,
    pub fetched_at: DateTime<Utc>,
}

impl ThemeData {
    /// True when this entry can answer a request for `name` at `now`
    /// without hitting the network.
    pub fn is_fresh(&self, name: &str, now: DateTime<Utc>) -> bool {
        self.name == name && now - self.fetched_at < Duration::hours(THEME_MAX_AGE_HOURS)
    }
}
