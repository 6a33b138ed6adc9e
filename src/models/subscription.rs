// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription model, flattened from the billing provider's
//! customer → subscriptions → plan → product graph.
//!
//! Only one flattened subscription is ever persisted; the raw graph is
//! discarded after selection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::jsonapi::{Document, Resource};
use crate::error::{AccountError, Result};

/// A subscription with its plan and product details merged in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Unix timestamp of subscription start
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub current_period_start: i64,
    #[serde(default)]
    pub current_period_end: i64,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub plan_name: String,
    /// Plan price in the currency's minor unit
    #[serde(default)]
    pub plan_amount: i64,
    #[serde(default)]
    pub plan_currency: String,
    #[serde(default)]
    pub plan_interval: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub status: String,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Flatten every subscription in a `stripe/customers` document.
pub fn subscriptions_from_document(doc: &Document) -> Result<Vec<Subscription>> {
    doc.included_of_kind("subscriptions")
        .map(|res| flatten_subscription(doc, res))
        .collect()
}

/// Pick the subscription to persist: `active` status, and when several
/// are active, the latest `created` wins (the most recently started
/// subscription supersedes the ones it replaced).
pub fn select_active(subscriptions: Vec<Subscription>) -> Option<Subscription> {
    subscriptions
        .into_iter()
        .filter(Subscription::is_active)
        .max_by_key(|s| s.created)
}

fn flatten_subscription(doc: &Document, res: &Resource) -> Result<Subscription> {
    let mut flat = res.attributes.clone();
    flat.insert("id".to_string(), Value::String(res.id.clone()));

    if let Some(plan_id) = res.related_id("plan") {
        flat.insert("planId".to_string(), Value::String(plan_id.to_string()));
        if let Some(plan) = doc.find_included("plans", plan_id) {
            copy_attr(&mut flat, plan, "name", "planName");
            copy_attr(&mut flat, plan, "amount", "planAmount");
            copy_attr(&mut flat, plan, "currency", "planCurrency");
            copy_attr(&mut flat, plan, "interval", "planInterval");

            if let Some(product_id) = plan.related_id("product") {
                flat.insert(
                    "productId".to_string(),
                    Value::String(product_id.to_string()),
                );
                if let Some(product) = doc.find_included("products", product_id) {
                    copy_attr(&mut flat, product, "name", "productName");
                }
            }
        }
    }

    serde_json::from_value(Value::Object(flat))
        .map_err(|e| AccountError::Parse(format!("subscription: {}", e)))
}

fn copy_attr(
    flat: &mut serde_json::Map<String, Value>,
    source: &Resource,
    from: &str,
    to: &str,
) {
    if let Some(value) = source.attributes.get(from) {
        flat.insert(to.to_string(), value.clone());
    }
}
