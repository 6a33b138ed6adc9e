//! User profile model.

use serde::{Deserialize, Serialize};

/// Profile of the logged-in user, as served by `users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Opaque user ID (matches the session identity)
    pub id: String,
    /// Email address
    pub email: String,
    /// Whether the address has been confirmed; gates settings sync
    #[serde(default)]
    pub email_validated: bool,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Capability tokens driving feature gating; `None` for free accounts
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    /// Stripe account reference (may be empty)
    #[serde(default)]
    pub stripe_account_id: String,
    /// Stripe customer reference (may be empty)
    #[serde(default)]
    pub stripe_customer_id: String,
}
