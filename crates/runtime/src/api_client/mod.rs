//! Typed HTTP client for the provider API

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, Settings};
use crate::error::ApiError;
use crate::find::find_match;

pub mod types;

use types::{
    ApiErrorBody, CreateFirewallRequest, CreateFirewallRuleRequest, CreateObjectStoreRequest,
    Firewall, FirewallResult, FirewallRule, Network, ObjectStore, ObjectStoreCredential,
    Paginated, SimpleResponse, UpdateFirewallRequest, UpdateObjectStoreRequest,
};

/// Page size used when walking paginated listings
const PAGE_SIZE: u32 = 100;

/// Configuration for the API client
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Region appended to every request
    pub region: Option<String>,
    /// Per request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            region: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl From<&Settings> for ApiConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            base_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            region: settings.region.clone(),
            timeout: settings.timeout,
        }
    }
}

/// Provider API client
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    region: Option<String>,
}

impl Client {
    /// Create a configured client
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", config.api_key))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("stratus-cli/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            region: config.region,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(method = %method, path, "API request");

        let builder = self.http.request(method, url);
        match &self.region {
            Some(region) => builder.query(&[("region", region.as_str())]),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        trace!(status = status.as_u16(), path, body = %body, "API response");

        if !status.is_success() {
            return Err(error_from_response(status, &body, path));
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path), path).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(method, path).json(body), path).await
    }

    async fn delete(&self, path: &str) -> Result<SimpleResponse, ApiError> {
        self.execute(self.request(Method::DELETE, path), path).await
    }

    /// Fetch every page of a paginated listing
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let builder = self
                .request(Method::GET, path)
                .query(&[("page", page), ("per_page", PAGE_SIZE)]);
            let listing: Paginated<T> = self.execute(builder, path).await?;

            items.extend(listing.items);
            if listing.page >= listing.pages {
                break;
            }
            page = listing.page + 1;
        }

        Ok(items)
    }

    // ========================================================================
    // Object stores
    // ========================================================================

    /// List every object store in the region, following pagination
    pub async fn list_object_stores(&self) -> Result<Vec<ObjectStore>, ApiError> {
        self.get_all_pages("/v2/objectstores").await
    }

    /// Fetch one object store by ID
    pub async fn get_object_store(&self, id: &str) -> Result<ObjectStore, ApiError> {
        self.get(&format!("/v2/objectstores/{id}")).await
    }

    /// Find an object store by ID or name
    pub async fn find_object_store(&self, search: &str) -> Result<ObjectStore, ApiError> {
        let stores = self.list_object_stores().await?;
        find_match(&stores, "object store", search).cloned()
    }

    /// Create an object store
    pub async fn create_object_store(
        &self,
        request: &CreateObjectStoreRequest,
    ) -> Result<ObjectStore, ApiError> {
        self.send_json(Method::POST, "/v2/objectstores", request)
            .await
    }

    /// Resize an object store
    pub async fn update_object_store(
        &self,
        id: &str,
        request: &UpdateObjectStoreRequest,
    ) -> Result<ObjectStore, ApiError> {
        self.send_json(Method::PUT, &format!("/v2/objectstores/{id}"), request)
            .await
    }

    /// Delete an object store
    pub async fn delete_object_store(&self, id: &str) -> Result<SimpleResponse, ApiError> {
        self.delete(&format!("/v2/objectstores/{id}")).await
    }

    /// List every object store credential in the region
    pub async fn list_object_store_credentials(
        &self,
    ) -> Result<Vec<ObjectStoreCredential>, ApiError> {
        self.get_all_pages("/v2/objectstore/credentials").await
    }

    /// Find the credential that owns `access_key`; only exact matches count
    pub async fn find_object_store_credential(
        &self,
        access_key: &str,
    ) -> Result<ObjectStoreCredential, ApiError> {
        let access_key = access_key.trim();
        let not_found = || ApiError::ZeroMatches {
            kind: "object store credential",
            search: access_key.to_string(),
        };
        if access_key.is_empty() {
            return Err(not_found());
        }

        self.list_object_store_credentials()
            .await?
            .into_iter()
            .find(|credential| credential.access_key_id == access_key)
            .ok_or_else(not_found)
    }

    // ========================================================================
    // Firewalls
    // ========================================================================

    /// List firewalls in the region
    pub async fn list_firewalls(&self) -> Result<Vec<Firewall>, ApiError> {
        self.get("/v2/firewalls").await
    }

    /// Find a firewall by ID or name
    pub async fn find_firewall(&self, search: &str) -> Result<Firewall, ApiError> {
        let firewalls = self.list_firewalls().await?;
        find_match(&firewalls, "firewall", search).cloned()
    }

    /// Create a firewall
    pub async fn create_firewall(
        &self,
        request: &CreateFirewallRequest,
    ) -> Result<FirewallResult, ApiError> {
        self.send_json(Method::POST, "/v2/firewalls", request).await
    }

    /// Rename a firewall
    pub async fn update_firewall(
        &self,
        id: &str,
        request: &UpdateFirewallRequest,
    ) -> Result<FirewallResult, ApiError> {
        self.send_json(Method::PUT, &format!("/v2/firewalls/{id}"), request)
            .await
    }

    /// Delete a firewall
    pub async fn delete_firewall(&self, id: &str) -> Result<SimpleResponse, ApiError> {
        self.delete(&format!("/v2/firewalls/{id}")).await
    }

    /// List the rules of a firewall
    pub async fn list_firewall_rules(
        &self,
        firewall_id: &str,
    ) -> Result<Vec<FirewallRule>, ApiError> {
        self.get(&format!("/v2/firewalls/{firewall_id}/rules")).await
    }

    /// Add a rule to a firewall
    pub async fn create_firewall_rule(
        &self,
        firewall_id: &str,
        request: &CreateFirewallRuleRequest,
    ) -> Result<FirewallRule, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/v2/firewalls/{firewall_id}/rules"),
            request,
        )
        .await
    }

    /// Remove a rule from a firewall
    pub async fn delete_firewall_rule(
        &self,
        firewall_id: &str,
        rule_id: &str,
    ) -> Result<SimpleResponse, ApiError> {
        self.delete(&format!("/v2/firewalls/{firewall_id}/rules/{rule_id}"))
            .await
    }

    // ========================================================================
    // Networks
    // ========================================================================

    /// List networks in the region
    pub async fn list_networks(&self) -> Result<Vec<Network>, ApiError> {
        self.get("/v2/networks").await
    }

    /// Find a network by ID, name or label
    pub async fn find_network(&self, search: &str) -> Result<Network, ApiError> {
        let networks = self.list_networks().await?;
        find_match(&networks, "network", search).cloned()
    }

    /// The region's default network
    pub async fn default_network(&self) -> Result<Network, ApiError> {
        self.list_networks()
            .await?
            .into_iter()
            .find(|network| network.default)
            .ok_or_else(|| ApiError::ZeroMatches {
                kind: "network",
                search: "default".to_string(),
            })
    }
}

fn error_from_response(status: StatusCode, body: &str, path: &str) -> ApiError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();

    if status == StatusCode::NOT_FOUND {
        let reason = parsed
            .map(|err| err.reason)
            .filter(|reason| !reason.is_empty())
            .unwrap_or_else(|| path.to_string());
        return ApiError::NotFound(reason);
    }

    match parsed {
        Some(err) if !err.reason.is_empty() || !err.code.is_empty() => ApiError::Status {
            status: status.as_u16(),
            code: err.code,
            reason: err.reason,
        },
        _ => ApiError::Status {
            status: status.as_u16(),
            code: status
                .canonical_reason()
                .unwrap_or("unknown")
                .to_lowercase()
                .replace(' ', "_"),
            reason: if body.trim().is_empty() {
                format!("request to {path} failed")
            } else {
                body.trim().to_string()
            },
        },
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
