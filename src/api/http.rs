// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `reqwest`-backed implementation of the account API.
//!
//! Identity endpoints take form-encoded credentials over a client with
//! an enabled cookie jar, so the provider's session cookie rides along
//! on subsequent resource calls. Resource endpoints speak JSON:API.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{AccountApi, Document, RegistrationForm};
use crate::config::Config;
use crate::error::{AccountError, Result};

const JSON_API_MIME: &str = "application/vnd.api+json";

/// HTTP client for the identity provider and account API.
#[derive(Clone)]
pub struct HttpAccountApi {
    http: reqwest::Client,
    auth_base: String,
    api_base: String,
}

impl HttpAccountApi {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            auth_base: config.auth_server_url.clone(),
            api_base: config.account_server_url.clone(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.auth_base, path)
    }

    fn resource_url(&self, resource: &str, id: &str, include: Option<&str>) -> String {
        let mut url = format!(
            "{}/api/v2/{}/{}",
            self.api_base,
            resource,
            urlencoding::encode(id)
        );
        if let Some(include) = include {
            url.push_str("?include=");
            url.push_str(&urlencoding::encode(include));
        }
        url
    }

    /// Consume an identity-endpoint response, surfacing the provider's
    /// raw status and body on rejection.
    async fn check_auth_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(AccountError::Auth { status, body })
    }

    /// Consume a resource-endpoint response, parsing the JSON body.
    async fn check_response_json(&self, response: reqwest::Response) -> Result<Document> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AccountError::Api(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AccountError::Parse(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .http
            .post(self.auth_url("login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("login request failed: {}", e)))?;

        self.check_auth_response(response).await
    }

    async fn register(&self, form: &RegistrationForm) -> Result<()> {
        let response = self
            .http
            .post(self.auth_url("register"))
            .form(&[
                ("email", form.email.as_str()),
                ("email_confirmation", form.confirm_email.as_str()),
                ("first_name", form.first_name.as_str()),
                ("last_name", form.last_name.as_str()),
                ("password", form.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("register request failed: {}", e)))?;

        self.check_auth_response(response).await
    }

    async fn revoke_session(&self, csrf_token: Option<&str>) -> Result<()> {
        let mut request = self.http.post(self.auth_url("logout"));
        if let Some(token) = csrf_token {
            request = request.header("X-CSRF-Token", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("logout request failed: {}", e)))?;

        self.check_auth_response(response).await
    }

    async fn get(&self, resource: &str, id: &str, include: Option<&str>) -> Result<Document> {
        let url = self.resource_url(resource, id, include);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, JSON_API_MIME)
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("GET {} failed: {}", url, e)))?;

        self.check_response_json(response).await
    }

    async fn update(&self, resource: &str, id: &str, payload: Value) -> Result<()> {
        let url = self.resource_url(resource, id, None);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, JSON_API_MIME)
            .json(&serde_json::json!({ "data": payload }))
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("POST {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AccountError::Api(format!("HTTP {}: {}", status, body)));
        }
        Ok(())
    }

    async fn send_validation_email(&self, user_id: &str) -> Result<u16> {
        let url = self.auth_url(&format!(
            "send_email/validate_account/{}",
            urlencoding::encode(user_id)
        ));
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("validation email request failed: {}", e)))?;

        Ok(response.status().as_u16())
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        let response = self
            .http
            .post(self.auth_url("send_email/reset_password"))
            .form(&[("email", email)])
            .send()
            .await
            .map_err(|e| AccountError::Api(format!("reset password request failed: {}", e)))?;

        self.check_auth_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_encodes_id() {
        let api = HttpAccountApi::new(&Config::default());
        let url = api.resource_url("themes", "midnight theme.css", None);
        assert!(url.ends_with("/api/v2/themes/midnight%20theme.css"));
    }

    #[test]
    fn test_resource_url_keeps_nested_resource_path() {
        let api = HttpAccountApi::new(&Config::default());
        let url = api.resource_url("stripe/customers", "u-1", Some("cards,subscriptions"));
        assert!(url.contains("/api/v2/stripe/customers/u-1"));
        assert!(url.ends_with("include=cards%2Csubscriptions"));
    }
}
