// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Hub-Account: account and session management core for the browser hub.
//!
//! This crate authenticates a user against the identity service,
//! persists the session across restarts via browser cookies, caches
//! derived account data (profile, settings, subscription, theme) with
//! staleness rules, and gates features by authorization scopes. View
//! rendering and onboarding routing live in the host product; they call
//! into the [`services::SessionManager`] and read reactively from the
//! [`services::AccountStore`].

pub mod api;
pub mod config;
pub mod cookies;
pub mod error;
pub mod events;
pub mod models;
pub mod scopes;
pub mod services;
pub mod settings;
pub mod validate;

pub use config::Config;
pub use error::{AccountError, Result};
pub use events::{AccountEvent, AccountEvents};
pub use services::{AccountStore, SessionManager};
pub use settings::Prefs;

use std::sync::Arc;

use api::{AccountApi, HttpAccountApi};
use cookies::CookieStore;

/// Wire up a session manager from a config and a platform cookie store,
/// using the HTTP gateway. Hosts with custom transports assemble the
/// pieces themselves.
pub fn build_session(config: Config, cookies: Arc<dyn CookieStore>) -> SessionManager {
    let api: Arc<dyn AccountApi> = Arc::new(HttpAccountApi::new(&config));
    let prefs = Arc::new(Prefs::new(&config.default_theme));
    let store = Arc::new(AccountStore::new(
        api.clone(),
        prefs,
        AccountEvents::new(),
    ));
    SessionManager::new(api, cookies, store, &config)
}
