// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: the single authority for transitions between
//! anonymous and authenticated.
//!
//! Per browser profile the session moves
//! `ANONYMOUS → AUTHENTICATING → AUTHENTICATED → ANONYMOUS`.
//! `AUTHENTICATING` is just the pending future of `login`/`register`/
//! cookie resolution; a failure lands back in `ANONYMOUS` with no
//! partial account record.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::api::{AccountApi, RegistrationForm};
use crate::config::Config;
use crate::cookies::{CookieDetails, CookieStore, CSRF_COOKIE, SESSION_COOKIES, USER_ID_COOKIE};
use crate::error::{AccountError, Result};
use crate::services::AccountStore;

/// Orchestrates login/register/logout, cookie lifecycle, and user-ID
/// resolution on top of the account store and the API gateway.
pub struct SessionManager {
    api: Arc<dyn AccountApi>,
    cookies: Arc<dyn CookieStore>,
    store: Arc<AccountStore>,
    cookie_ttl_days: i64,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn AccountApi>,
        cookies: Arc<dyn CookieStore>,
        store: Arc<AccountStore>,
        config: &Config,
    ) -> Self {
        Self {
            api,
            cookies,
            store,
            cookie_ttl_days: config.cookie_ttl_days,
        }
    }

    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Submit credentials to the identity endpoint.
    ///
    /// On 2xx the provider sets the HTTP session cookie out-of-band and
    /// this resolves `Ok(())`; rejection fails with the provider's raw
    /// status and body. The identity cookie is resolved best-effort
    /// afterwards; if the platform has not surfaced it yet, the store
    /// stays anonymous until the next resolution attempt.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.api.login(email, password).await?;
        tracing::info!("login accepted");

        match self.resolve_user_id() {
            Ok(user_id) => tracing::debug!(user_id = %user_id, "identity resolved after login"),
            Err(_) => tracing::debug!("identity cookie not visible yet after login"),
        }
        Ok(())
    }

    /// Create an account. Contract and failure shape match [`Self::login`].
    ///
    /// Inputs must already have passed the credential validator (email
    /// match, password complexity); this layer does not re-validate.
    pub async fn register(
        &self,
        email: &str,
        confirm_email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        let form = RegistrationForm {
            email: email.to_string(),
            confirm_email: confirm_email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.api.register(&form).await?;
        tracing::info!("registration accepted");

        match self.resolve_user_id() {
            Ok(user_id) => {
                tracing::debug!(user_id = %user_id, "identity resolved after registration")
            }
            Err(_) => tracing::debug!("identity cookie not visible yet after registration"),
        }
        Ok(())
    }

    /// End the session. Server-side revocation is best-effort; local
    /// state clearing and cookie removal always happen, because local
    /// lockout must never depend on network availability.
    pub async fn logout(&self) -> Result<()> {
        let csrf = self.cookies.get(CSRF_COOKIE);
        if let Err(e) = self.api.revoke_session(csrf.as_deref()).await {
            tracing::warn!(error = %e, "session revocation failed, clearing local state anyway");
        }

        self.store.clear_account_info();
        self.remove_cookies();
        Ok(())
    }

    /// The current user ID: the cached identity when present, otherwise
    /// resolved from the persisted identity cookie. A cookie hit
    /// re-initializes the account record (cookie restoration).
    pub fn resolve_user_id(&self) -> Result<String> {
        if let Some(user_id) = self.store.user_id() {
            return Ok(user_id);
        }

        let user_id = self
            .cookies
            .get(USER_ID_COOKIE)
            .filter(|v| !v.is_empty())
            .ok_or(AccountError::NotLoggedIn)?;

        self.store.set_account_info(&user_id);
        tracing::info!(user_id = %user_id, "session restored from identity cookie");
        Ok(user_id)
    }

    /// Startup convenience: attempt cookie restoration and report
    /// whether an identity came back.
    pub fn restore_session(&self) -> bool {
        self.resolve_user_id().is_ok()
    }

    /// Write a login cookie. Empty `name` or `value` is a precondition
    /// violation surfaced before the adapter is touched; a missing
    /// expiration defaults to the configured TTL from now.
    pub fn set_login_cookie(&self, mut details: CookieDetails) -> Result<()> {
        if details.name.is_empty() {
            return Err(AccountError::MissingField("name"));
        }
        if details.value.is_empty() {
            return Err(AccountError::MissingField("value"));
        }
        if details.expiration.is_none() {
            details.expiration = Some(Utc::now() + Duration::days(self.cookie_ttl_days));
        }
        self.cookies.set(details);
        Ok(())
    }

    /// Remove every session cookie. Idempotent.
    pub fn remove_cookies(&self) {
        for name in SESSION_COOKIES {
            self.cookies.remove(name);
        }
    }
}
