// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON:API document model and normalization.
//!
//! The account API serves `{ data: { id, type, attributes, relationships },
//! included: [...] }` documents. Consumers never walk that shape
//! directly; resources are normalized (attributes merged with `id`) and
//! decoded into typed models, so a malformed payload surfaces as one
//! `Parse` error instead of a panic deep in an access chain.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AccountError, Result};

/// A JSON:API response document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub data: Option<Resource>,
    #[serde(default)]
    pub included: Vec<Resource>,
}

/// A single resource object.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

/// A relationship linkage entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

/// One-or-many resource linkage.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// Resource identifier inside a relationship.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Document {
    /// The primary resource, or a `Parse` error when the document has none.
    pub fn primary(&self) -> Result<&Resource> {
        self.data
            .as_ref()
            .ok_or_else(|| AccountError::Parse("document has no primary resource".to_string()))
    }

    /// Included resources of a given type.
    pub fn included_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.included.iter().filter(move |r| r.kind == kind)
    }

    /// Look up one included resource by type and id.
    pub fn find_included(&self, kind: &str, id: &str) -> Option<&Resource> {
        self.included.iter().find(|r| r.kind == kind && r.id == id)
    }
}

impl Resource {
    /// Merge `id` into the attribute map, producing the flat object the
    /// typed models deserialize from.
    pub fn normalize(&self) -> Value {
        let mut attrs = self.attributes.clone();
        attrs.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(attrs)
    }

    /// Decode this resource into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.normalize()).map_err(|e| AccountError::Parse(e.to_string()))
    }

    /// The id of a to-one relationship target, if linked.
    pub fn related_id(&self, name: &str) -> Option<&str> {
        match self.relationships.get(name)?.data.as_ref()? {
            Linkage::One(ident) => Some(ident.id.as_str()),
            Linkage::Many(_) => None,
        }
    }
}
