//! Remote API layer (identity provider + account resources).

pub mod http;
pub mod jsonapi;

pub use http::HttpAccountApi;
pub use jsonapi::{Document, Resource};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Resource paths as constants.
pub mod resources {
    pub const USERS: &str = "users";
    pub const SETTINGS: &str = "settings";
    pub const STRIPE_CUSTOMERS: &str = "stripe/customers";
    pub const THEMES: &str = "themes";
}

/// Registration form fields. The caller validates email/confirm match
/// and password complexity before submission (see [`crate::validate`]).
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub email: String,
    pub confirm_email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Full remote surface consumed by the session manager and account
/// store. Behind a trait so tests and embedding hosts can swap the
/// transport without touching account logic.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Submit credentials to the identity endpoint. `Ok(())` on 2xx;
    /// the provider sets the HTTP session cookie out-of-band.
    async fn login(&self, email: &str, password: &str) -> Result<()>;

    /// Create an account. Same contract and failure shape as `login`.
    async fn register(&self, form: &RegistrationForm) -> Result<()>;

    /// Revoke the server-side session. Callers treat failure as
    /// non-fatal; local lockout never depends on this succeeding.
    async fn revoke_session(&self, csrf_token: Option<&str>) -> Result<()>;

    /// Fetch a JSON:API resource, optionally with included relations.
    async fn get(&self, resource: &str, id: &str, include: Option<&str>) -> Result<Document>;

    /// Push a JSON:API resource update.
    async fn update(&self, resource: &str, id: &str, payload: Value) -> Result<()>;

    /// Request a validation email. Returns the response status code.
    async fn send_validation_email(&self, user_id: &str) -> Result<u16>;

    /// Request a password-reset email. Fails with the raw provider
    /// response on a non-success status.
    async fn reset_password(&self, email: &str) -> Result<()>;
}
