// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account state store: the cached, query-able view of the
//! authenticated identity's data.
//!
//! The store owns the [`AccountRecord`] exclusively; everything outside
//! reads clones and mutates through the methods here. Fetches are not
//! serialized against each other: two overlapping `get_user` calls
//! race and the last response to resolve wins. What IS fenced is
//! identity turnover. Every `set_account_info`/`clear_account_info`
//! bumps a generation counter, and a fetch started under an older
//! generation discards its result instead of repopulating a cleared or
//! replaced record.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use serde_json::{json, Value};

use crate::api::{resources, AccountApi};
use crate::error::{AccountError, Result};
use crate::events::{AccountEvent, AccountEvents};
use crate::models::subscription::{select_active, subscriptions_from_document};
use crate::models::{Subscription, ThemeData, UserProfile};
use crate::scopes::scopes_satisfy;
use crate::settings::{apply_remote_settings, build_user_settings, Prefs, SettingsBlob};

/// Cached bundle for the current identity. Exists iff a user is
/// logged in; nested fields fill in lazily as each fetch completes.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub user_id: String,
    pub user: Option<UserProfile>,
    pub user_settings: Option<SettingsBlob>,
    pub subscription_data: Option<Subscription>,
    pub theme_data: Option<ThemeData>,
}

impl AccountRecord {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            user: None,
            user_settings: None,
            subscription_data: None,
            theme_data: None,
        }
    }
}

/// Single source of truth for "who is logged in and what can they do."
pub struct AccountStore {
    api: Arc<dyn AccountApi>,
    prefs: Arc<Prefs>,
    events: AccountEvents,
    record: RwLock<Option<AccountRecord>>,
    /// Bumped on every identity transition; fences late fetch commits.
    generation: AtomicU64,
    /// Most recent swallowed fetch failure, so `None` results aren't
    /// fully invisible to diagnostics.
    last_fetch_error: Mutex<Option<String>>,
}

impl AccountStore {
    pub fn new(api: Arc<dyn AccountApi>, prefs: Arc<Prefs>, events: AccountEvents) -> Self {
        Self {
            api,
            prefs,
            events,
            record: RwLock::new(None),
            generation: AtomicU64::new(0),
            last_fetch_error: Mutex::new(None),
        }
    }

    // ─── Identity Lifecycle ──────────────────────────────────────

    /// Reset the record for a freshly resolved identity. All nested
    /// fields start empty and fill in lazily.
    pub fn set_account_info(&self, user_id: &str) {
        let mut guard = self.record.write().expect("account record lock poisoned");
        self.generation.fetch_add(1, Ordering::AcqRel);
        *guard = Some(AccountRecord::new(user_id));
        tracing::debug!(user_id, "account record initialized");
    }

    /// Drop the record and restore the default theme. Idempotent, and
    /// must run on logout and on any detected cookie invalidation.
    pub fn clear_account_info(&self) {
        let was_present = {
            let mut guard = self.record.write().expect("account record lock poisoned");
            self.generation.fetch_add(1, Ordering::AcqRel);
            guard.take().is_some()
        };
        self.prefs.reset_theme();
        *self
            .last_fetch_error
            .lock()
            .expect("fetch error lock poisoned") = None;
        if was_present {
            self.events.emit(AccountEvent::AccountCleared);
            tracing::info!("account cleared");
        }
    }

    /// The current identity, if logged in.
    pub fn user_id(&self) -> Option<String> {
        self.record
            .read()
            .expect("account record lock poisoned")
            .as_ref()
            .map(|r| r.user_id.clone())
    }

    /// Clone of the full record for reactive UI reads.
    pub fn snapshot(&self) -> Option<AccountRecord> {
        self.record
            .read()
            .expect("account record lock poisoned")
            .clone()
    }

    /// Most recent fetch failure swallowed into a `None` result.
    pub fn last_fetch_error(&self) -> Option<String> {
        self.last_fetch_error
            .lock()
            .expect("fetch error lock poisoned")
            .clone()
    }

    // ─── Profile ─────────────────────────────────────────────────

    /// Fetch and cache the user profile.
    ///
    /// Returns `Ok(None)` when the request fails: callers must treat
    /// that as "data temporarily unavailable", never as "logged out".
    /// The failure is recorded in [`Self::last_fetch_error`].
    pub async fn get_user(&self) -> Result<Option<UserProfile>> {
        let (user_id, generation) = self.identity()?;

        let doc = match self.api.get(resources::USERS, &user_id, None).await {
            Ok(doc) => doc,
            Err(e) if e.is_transport() => {
                self.note_fetch_error("get_user", &e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let user: UserProfile = doc.primary()?.decode()?;

        if !self.commit(generation, |record| record.user = Some(user.clone())) {
            return Ok(None);
        }
        self.events.emit(AccountEvent::UserUpdated);
        Ok(Some(user))
    }

    // ─── Settings ────────────────────────────────────────────────

    /// Fetch remote settings and reconcile them into local state.
    ///
    /// Gated on a validated email address; unverified accounts quietly
    /// get `Ok(None)`. Only allow-listed keys reach local state.
    pub async fn get_user_settings(&self) -> Result<Option<SettingsBlob>> {
        let Some((user_id, generation)) = self.verified_user_id().await? else {
            return Ok(None);
        };

        let doc = match self.api.get(resources::SETTINGS, &user_id, None).await {
            Ok(doc) => doc,
            Err(e) if e.is_transport() => {
                self.note_fetch_error("get_user_settings", &e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let blob = settings_from_document(&doc)?;

        if !self.commit(generation, |record| {
            record.user_settings = Some(blob.clone())
        }) {
            return Ok(None);
        }
        apply_remote_settings(&self.prefs, &blob);
        self.events.emit(AccountEvent::SettingsUpdated);
        Ok(Some(blob))
    }

    /// Push the local sync-set projection to the server. Loud gate:
    /// a write on an unverified account is a caller error.
    pub async fn save_user_settings(&self) -> Result<()> {
        let Some((user_id, _)) = self.verified_user_id().await? else {
            return Err(AccountError::NotVerified);
        };

        let blob = self.build_user_settings();
        let payload = json!({
            "type": "settings",
            "id": user_id,
            "attributes": { "settings_json": blob },
        });
        self.api.update(resources::SETTINGS, &user_id, payload).await
    }

    /// The allow-listed projection of local settings (the payload
    /// `save_user_settings` pushes).
    pub fn build_user_settings(&self) -> SettingsBlob {
        build_user_settings(&self.prefs)
    }

    // ─── Subscription ────────────────────────────────────────────

    /// Fetch the billing graph and persist the winning subscription:
    /// `active` status, latest `created` on ties. The raw graph is
    /// never kept.
    pub async fn get_user_subscription_data(&self) -> Result<Option<Subscription>> {
        let (user_id, generation) = self.identity()?;

        let doc = self
            .api
            .get(
                resources::STRIPE_CUSTOMERS,
                &user_id,
                Some("cards,subscriptions"),
            )
            .await?;

        let subscriptions = subscriptions_from_document(&doc)?;
        let Some(winner) = select_active(subscriptions) else {
            tracing::debug!(user_id = %user_id, "no active subscription");
            return Ok(None);
        };

        if !self.commit_subscription(generation, winner.clone()) {
            return Ok(None);
        }
        Ok(Some(winner))
    }

    /// Commit a subscription at the current generation.
    pub fn set_subscription_data(&self, subscription: Subscription) -> bool {
        let generation = self.generation.load(Ordering::Acquire);
        self.commit_subscription(generation, subscription)
    }

    fn commit_subscription(&self, generation: u64, subscription: Subscription) -> bool {
        if !self.commit(generation, |record| {
            record.subscription_data = Some(subscription)
        }) {
            return false;
        }
        if self.prefs.mark_paid_subscription() {
            tracing::info!("paid subscription detected");
        }
        self.events.emit(AccountEvent::SubscriptionUpdated);
        true
    }

    // ─── Theme ───────────────────────────────────────────────────

    /// Return the theme CSS, served from cache when the cached entry
    /// matches the requested name and is under 24 hours old.
    pub async fn get_theme(&self, name: &str) -> Result<String> {
        let (user_id, generation) = self.identity()?;

        {
            let guard = self.record.read().expect("account record lock poisoned");
            if let Some(theme) = guard.as_ref().and_then(|r| r.theme_data.as_ref()) {
                if theme.is_fresh(name, Utc::now()) {
                    return Ok(theme.css.clone());
                }
            }
        }

        tracing::debug!(user_id = %user_id, theme = name, "fetching theme");
        let doc = self
            .api
            .get(resources::THEMES, &format!("{}.css", name), None)
            .await?;
        let css = doc
            .primary()?
            .attributes
            .get("css")
            .and_then(Value::as_str)
            .ok_or_else(|| AccountError::Parse("theme document missing css attribute".to_string()))?
            .to_string();

        let theme = ThemeData {
            name: name.to_string(),
            css: css.clone(),
            fetched_at: Utc::now(),
        };
        self.commit_theme(generation, theme);
        Ok(css)
    }

    /// Commit a theme cache entry at the current generation.
    pub fn set_theme_data(&self, theme: ThemeData) -> bool {
        let generation = self.generation.load(Ordering::Acquire);
        self.commit_theme(generation, theme)
    }

    fn commit_theme(&self, generation: u64, theme: ThemeData) -> bool {
        if !self.commit(generation, |record| record.theme_data = Some(theme)) {
            return false;
        }
        self.events.emit(AccountEvent::ThemeUpdated);
        true
    }

    // ─── Email Flows ─────────────────────────────────────────────

    /// Ask the provider to send a validation email. Callers treat the
    /// result as a UI hint, not a hard failure, so nothing here throws.
    pub async fn send_validate_account_email(&self) -> bool {
        let Ok((user_id, _)) = self.identity() else {
            return false;
        };
        match self.api.send_validation_email(&user_id).await {
            Ok(status) => status < 400,
            Err(e) => {
                tracing::warn!(error = %e, "validation email request failed");
                false
            }
        }
    }

    /// Request a password-reset email. Fails with the raw provider
    /// response on rejection.
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.api.reset_password(email).await
    }

    // ─── Authorization ───────────────────────────────────────────

    /// Scope gate against the cached profile, with no server round
    /// trip ("unverified"). No account, no profile, or no recorded
    /// scopes all fail closed.
    pub fn has_scopes_unverified<S: AsRef<str>>(&self, required: &[S]) -> bool {
        let guard = self.record.read().expect("account record lock poisoned");
        let Some(user) = guard.as_ref().and_then(|r| r.user.as_ref()) else {
            return false;
        };
        let Some(scopes) = user.scopes.as_ref() else {
            return false;
        };
        scopes_satisfy(scopes, required)
    }

    // ─── Internals ───────────────────────────────────────────────

    /// Current identity plus the generation to fence a fetch against.
    fn identity(&self) -> Result<(String, u64)> {
        let guard = self.record.read().expect("account record lock poisoned");
        match guard.as_ref() {
            Some(record) => Ok((
                record.user_id.clone(),
                self.generation.load(Ordering::Acquire),
            )),
            None => Err(AccountError::NotLoggedIn),
        }
    }

    /// Identity for email-gated operations. `Ok(None)` when the
    /// profile is unavailable or the email is not validated.
    async fn verified_user_id(&self) -> Result<Option<(String, u64)>> {
        let (user_id, generation) = self.identity()?;

        let cached = self
            .record
            .read()
            .expect("account record lock poisoned")
            .as_ref()
            .and_then(|r| r.user.clone());

        let user = match cached {
            Some(user) => user,
            None => match self.get_user().await? {
                Some(user) => user,
                None => return Ok(None),
            },
        };

        if !user.email_validated {
            tracing::debug!(user_id = %user_id, "email not validated, settings sync gated");
            return Ok(None);
        }
        Ok(Some((user_id, generation)))
    }

    /// Apply a record mutation iff the identity generation still
    /// matches and a record is present. Returns whether it committed.
    fn commit<F>(&self, generation: u64, apply: F) -> bool
    where
        F: FnOnce(&mut AccountRecord),
    {
        let mut guard = self.record.write().expect("account record lock poisoned");
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("discarding late response for a replaced or cleared identity");
            return false;
        }
        match guard.as_mut() {
            Some(record) => {
                apply(record);
                true
            }
            None => false,
        }
    }

    fn note_fetch_error(&self, operation: &str, error: &AccountError) {
        tracing::warn!(operation, error = %error, "fetch failed, returning none");
        *self
            .last_fetch_error
            .lock()
            .expect("fetch error lock poisoned") = Some(format!("{}: {}", operation, error));
    }
}

/// Extract the settings blob from a `settings/{id}` document.
fn settings_from_document(doc: &crate::api::Document) -> Result<SettingsBlob> {
    doc.primary()?
        .attributes
        .get("settings_json")
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| AccountError::Parse("settings document missing settings_json".to_string()))
}
