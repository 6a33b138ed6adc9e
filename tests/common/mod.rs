// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: an offline mock of the account API plus a
//! fully wired session/store pair.

// Each test binary uses a different slice of these helpers.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{json, Value};
use tokio::sync::Notify;

use hub_account::api::{AccountApi, Document, RegistrationForm};
use hub_account::cookies::{CookieStore, MemoryCookieJar};
use hub_account::error::{AccountError, Result};
use hub_account::services::{AccountStore, SessionManager};
use hub_account::{AccountEvents, Config, Prefs};

/// Pauses one resource fetch so tests can interleave other operations
/// between request issue and response arrival.
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// In-process implementation of the account API with canned documents
/// and per-method call counters.
#[derive(Default)]
pub struct MockApi {
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub revoke_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub email_calls: AtomicUsize,

    docs: DashMap<String, Value>,
    failing: DashMap<String, String>,
    login_failure: Mutex<Option<(u16, String)>>,
    register_failure: Mutex<Option<(u16, String)>>,
    reset_failure: Mutex<Option<(u16, String)>>,
    revoke_fails: Mutex<bool>,
    validation_email_status: Mutex<u16>,
    update_payloads: Mutex<Vec<(String, Value)>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        *api.validation_email_status.lock().unwrap() = 200;
        api
    }

    pub fn insert_doc(&self, resource: &str, id: &str, doc: Value) {
        self.docs.insert(format!("{}/{}", resource, id), doc);
    }

    pub fn fail_resource(&self, resource: &str, id: &str, message: &str) {
        self.failing
            .insert(format!("{}/{}", resource, id), message.to_string());
    }

    pub fn fail_login(&self, status: u16, body: &str) {
        *self.login_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn fail_register(&self, status: u16, body: &str) {
        *self.register_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn fail_reset(&self, status: u16, body: &str) {
        *self.reset_failure.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn fail_revocation(&self) {
        *self.revoke_fails.lock().unwrap() = true;
    }

    pub fn set_validation_email_status(&self, status: u16) {
        *self.validation_email_status.lock().unwrap() = status;
    }

    pub fn update_payloads(&self) -> Vec<(String, Value)> {
        self.update_payloads.lock().unwrap().clone()
    }

    /// Hold the next resource fetch until the returned gate is released.
    pub fn install_gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn auth_failure(slot: &Mutex<Option<(u16, String)>>) -> Result<()> {
        match slot.lock().unwrap().as_ref() {
            Some((status, body)) => Err(AccountError::Auth {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountApi for MockApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Self::auth_failure(&self.login_failure)
    }

    async fn register(&self, _form: &RegistrationForm) -> Result<()> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        Self::auth_failure(&self.register_failure)
    }

    async fn revoke_session(&self, _csrf_token: Option<&str>) -> Result<()> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        if *self.revoke_fails.lock().unwrap() {
            return Err(AccountError::Api("connection reset".to_string()));
        }
        Ok(())
    }

    async fn get(&self, resource: &str, id: &str, _include: Option<&str>) -> Result<Document> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let key = format!("{}/{}", resource, id);
        if let Some(message) = self.failing.get(&key) {
            return Err(AccountError::Api(message.value().clone()));
        }
        let doc = self
            .docs
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AccountError::Api(format!("HTTP 404: no fixture for {}", key)))?;
        serde_json::from_value(doc).map_err(|e| AccountError::Parse(e.to_string()))
    }

    async fn update(&self, resource: &str, id: &str, payload: Value) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.update_payloads
            .lock()
            .unwrap()
            .push((format!("{}/{}", resource, id), payload));
        Ok(())
    }

    async fn send_validation_email(&self, _user_id: &str) -> Result<u16> {
        self.email_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.validation_email_status.lock().unwrap())
    }

    async fn reset_password(&self, _email: &str) -> Result<()> {
        Self::auth_failure(&self.reset_failure)
    }
}

// ─── Fixtures ────────────────────────────────────────────────────

pub const USER_ID: &str = "d7999be5-210b-44f1-855d-3cf00ff579db";

pub fn user_doc(id: &str, email_validated: bool, scopes: Value) -> Value {
    json!({
        "data": {
            "id": id,
            "type": "users",
            "attributes": {
                "email": "ben.hub+85@example.com",
                "emailValidated": email_validated,
                "firstName": "Leury",
                "lastName": "Rodriguez",
                "scopes": scopes,
                "stripeAccountId": "",
                "stripeCustomerId": ""
            }
        }
    })
}

pub fn settings_doc(id: &str, settings_json: Value) -> Value {
    json!({
        "data": {
            "id": id,
            "type": "settings",
            "attributes": { "settings_json": settings_json }
        }
    })
}

pub fn theme_doc(name: &str, css: &str) -> Value {
    json!({
        "data": {
            "id": name,
            "type": "themes",
            "attributes": { "css": css }
        }
    })
}

/// A customers document with one subscription per `(id, status, created)`
/// entry, all sharing a plan/product pair.
pub fn customers_doc(id: &str, subscriptions: &[(&str, &str, i64)]) -> Value {
    let linkage: Vec<Value> = subscriptions
        .iter()
        .map(|(sub_id, _, _)| json!({ "id": sub_id, "type": "subscriptions" }))
        .collect();

    let mut included: Vec<Value> = subscriptions
        .iter()
        .map(|(sub_id, status, created)| {
            json!({
                "id": sub_id,
                "type": "subscriptions",
                "attributes": {
                    "cancelAtPeriodEnd": false,
                    "created": created,
                    "currentPeriodStart": created,
                    "currentPeriodEnd": created + 2_592_000,
                    "status": status
                },
                "relationships": { "plan": { "data": { "id": "plan_premium", "type": "plans" } } }
            })
        })
        .collect();
    included.push(json!({
        "id": "plan_premium",
        "type": "plans",
        "attributes": { "name": "Premium", "amount": 499, "currency": "usd", "interval": "month" },
        "relationships": { "product": { "data": { "id": "prod_hub", "type": "products" } } }
    }));
    included.push(json!({
        "id": "prod_hub",
        "type": "products",
        "attributes": { "name": "Hub Premium" }
    }));

    json!({
        "data": {
            "id": id,
            "type": "customers",
            "attributes": {},
            "relationships": { "subscriptions": { "data": linkage } }
        },
        "included": included
    })
}

// ─── Wiring ──────────────────────────────────────────────────────

pub struct TestSession {
    pub api: Arc<MockApi>,
    pub cookies: Arc<MemoryCookieJar>,
    pub prefs: Arc<Prefs>,
    pub events: AccountEvents,
    pub store: Arc<AccountStore>,
    pub session: SessionManager,
}

/// Create a session manager and store wired to offline mock
/// collaborators.
pub fn create_test_session() -> TestSession {
    let config = Config::default();
    let api = Arc::new(MockApi::new());
    let cookies = Arc::new(MemoryCookieJar::new());
    let prefs = Arc::new(Prefs::new(&config.default_theme));
    let events = AccountEvents::new();

    let store = Arc::new(AccountStore::new(
        api.clone() as Arc<dyn AccountApi>,
        prefs.clone(),
        events.clone(),
    ));
    let session = SessionManager::new(
        api.clone() as Arc<dyn AccountApi>,
        cookies.clone() as Arc<dyn CookieStore>,
        store.clone(),
        &config,
    );

    TestSession {
        api,
        cookies,
        prefs,
        events,
        store,
        session,
    }
}
