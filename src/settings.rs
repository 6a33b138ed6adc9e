// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local settings state and server synchronization rules.
//!
//! [`Prefs`] is the explicitly owned replacement for what used to be a
//! global configuration object: the extension's local setting values
//! plus the active theme and the sticky paid-subscription flag. The
//! sync functions project between `Prefs` and the server-side settings
//! blob, restricted to the allow-listed key set in both directions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use dashmap::DashMap;
use serde_json::{Map, Value};

/// A server-shaped settings payload: setting-key → value.
pub type SettingsBlob = Map<String, Value>;

/// Keys exchanged with the settings endpoint. Keys the server sends
/// outside this set never reach local state, and local keys outside it
/// are never pushed.
pub const SYNC_KEYS: [&str; 20] = [
    "alert_bubble_pos",
    "alert_bubble_timeout",
    "alert_expanded",
    "block_by_default",
    "block_new_trackers",
    "current_theme",
    "enable_ad_block",
    "enable_anti_tracking",
    "enable_autoupdate",
    "enable_click2play",
    "enable_metrics",
    "enable_smart_block",
    "hide_alert_trusted",
    "ignore_first_party",
    "notify_library_updates",
    "selected_app_ids",
    "show_alert",
    "show_badge",
    "site_allowlist",
    "site_blocklist",
];

/// Purely local UI state, never synchronized even though the keys live
/// alongside the synced ones.
pub const LOCAL_ONLY_KEYS: [&str; 2] = ["reload_banner_status", "trackers_banner_status"];

/// Injectable local configuration state.
pub struct Prefs {
    values: DashMap<String, Value>,
    current_theme: RwLock<String>,
    paid_subscription: AtomicBool,
    default_theme: String,
}

impl Prefs {
    pub fn new(default_theme: &str) -> Self {
        Self {
            values: DashMap::new(),
            current_theme: RwLock::new(default_theme.to_string()),
            paid_subscription: AtomicBool::new(false),
            default_theme: default_theme.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|v| v.value().clone())
    }

    pub fn set(&self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn current_theme(&self) -> String {
        self.current_theme.read().expect("theme lock poisoned").clone()
    }

    pub fn set_current_theme(&self, name: &str) {
        *self.current_theme.write().expect("theme lock poisoned") = name.to_string();
    }

    /// Restore the theme configured as the default.
    pub fn reset_theme(&self) {
        let default = self.default_theme.clone();
        self.set_current_theme(&default);
    }

    pub fn has_paid_subscription(&self) -> bool {
        self.paid_subscription.load(Ordering::Acquire)
    }

    /// Mark the account as paid. Returns `true` on the first flip.
    pub fn mark_paid_subscription(&self) -> bool {
        !self.paid_subscription.swap(true, Ordering::AcqRel)
    }
}

/// Write allow-listed keys from a remote settings blob into local state.
///
/// Unknown remote keys are dropped so a newer server schema can never
/// plant values a future local version would misread.
pub fn apply_remote_settings(prefs: &Prefs, remote: &SettingsBlob) {
    for key in SYNC_KEYS {
        if let Some(value) = remote.get(key) {
            prefs.set(key, value.clone());
        }
    }
}

/// Project local state down to exactly the allow-listed sync keys,
/// producing the payload pushed to the settings endpoint. Keys with no
/// local value are omitted rather than sent as null.
pub fn build_user_settings(prefs: &Prefs) -> SettingsBlob {
    let mut blob = Map::new();
    for key in SYNC_KEYS {
        if let Some(value) = prefs.get(key) {
            blob.insert(key.to_string(), value);
        }
    }
    blob
}
