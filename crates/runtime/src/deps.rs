//! Dependency injection traits for testability
//!
//! This module provides trait abstractions for all external dependencies,
//! allowing for easy mocking and testing.

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;

use crate::api_client::{Client as ApiClient, types};

/// Provider API operations
#[async_trait]
pub trait CloudApiClient: Send + Sync {
    /// List object stores
    async fn list_object_stores(&self) -> Result<Vec<types::ObjectStore>>;

    /// Get object store by ID
    async fn get_object_store(&self, id: &str) -> Result<types::ObjectStore>;

    /// Find object store by ID or name
    async fn find_object_store(&self, search: &str) -> Result<types::ObjectStore>;

    /// Create object store
    async fn create_object_store(
        &self,
        request: &types::CreateObjectStoreRequest,
    ) -> Result<types::ObjectStore>;

    /// Update object store
    async fn update_object_store(
        &self,
        id: &str,
        request: &types::UpdateObjectStoreRequest,
    ) -> Result<types::ObjectStore>;

    /// Delete object store
    async fn delete_object_store(&self, id: &str) -> Result<types::SimpleResponse>;

    /// Find the object store credential owning an access key
    async fn find_object_store_credential(
        &self,
        access_key: &str,
    ) -> Result<types::ObjectStoreCredential>;

    /// List firewalls
    async fn list_firewalls(&self) -> Result<Vec<types::Firewall>>;

    /// Find firewall by ID or name
    async fn find_firewall(&self, search: &str) -> Result<types::Firewall>;

    /// Create firewall
    async fn create_firewall(
        &self,
        request: &types::CreateFirewallRequest,
    ) -> Result<types::FirewallResult>;

    /// Update firewall
    async fn update_firewall(
        &self,
        id: &str,
        request: &types::UpdateFirewallRequest,
    ) -> Result<types::FirewallResult>;

    /// Delete firewall
    async fn delete_firewall(&self, id: &str) -> Result<types::SimpleResponse>;

    /// List firewall rules
    async fn list_firewall_rules(&self, firewall_id: &str) -> Result<Vec<types::FirewallRule>>;

    /// Create firewall rule
    async fn create_firewall_rule(
        &self,
        firewall_id: &str,
        request: &types::CreateFirewallRuleRequest,
    ) -> Result<types::FirewallRule>;

    /// Delete firewall rule
    async fn delete_firewall_rule(
        &self,
        firewall_id: &str,
        rule_id: &str,
    ) -> Result<types::SimpleResponse>;

    /// Find network by ID, name or label
    async fn find_network(&self, search: &str) -> Result<types::Network>;

    /// Get the region's default network
    async fn default_network(&self) -> Result<types::Network>;
}

/// Time/clock operations
pub trait Clock: Send + Sync {
    /// Get current instant
    fn now(&self) -> Instant;

    /// Create duration from milliseconds
    fn duration_from_millis(&self, millis: u64) -> Duration;
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);

    /// Check if running in interactive mode
    fn is_interactive(&self) -> bool;

    /// Ask a yes/no question
    fn prompt_confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    /// Set the message
    fn set_message(&self, message: &str);

    /// Finish and clear the progress
    fn finish_and_clear(&self);

    /// Enable steady tick
    fn enable_steady_tick(&self, duration: Duration);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Green text
    Green,
    /// Yellow text
    Yellow,
    /// Error style (red + bold)
    Error,
    /// Success style (green + bold)
    Success,
}

/// Async runtime operations
#[async_trait]
pub trait AsyncRuntime: Send + Sync {
    /// Sleep for a duration
    async fn sleep(&self, duration: Duration);
}

// Production implementations

/// Production API client wrapper
pub struct RealCloudApiClient {
    client: ApiClient,
}

impl RealCloudApiClient {
    /// Wrap a configured client
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CloudApiClient for RealCloudApiClient {
    async fn list_object_stores(&self) -> Result<Vec<types::ObjectStore>> {
        Ok(self.client.list_object_stores().await?)
    }

    async fn get_object_store(&self, id: &str) -> Result<types::ObjectStore> {
        Ok(self.client.get_object_store(id).await?)
    }

    async fn find_object_store(&self, search: &str) -> Result<types::ObjectStore> {
        Ok(self.client.find_object_store(search).await?)
    }

    async fn create_object_store(
        &self,
        request: &types::CreateObjectStoreRequest,
    ) -> Result<types::ObjectStore> {
        Ok(self.client.create_object_store(request).await?)
    }

    async fn update_object_store(
        &self,
        id: &str,
        request: &types::UpdateObjectStoreRequest,
    ) -> Result<types::ObjectStore> {
        Ok(self.client.update_object_store(id, request).await?)
    }

    async fn delete_object_store(&self, id: &str) -> Result<types::SimpleResponse> {
        Ok(self.client.delete_object_store(id).await?)
    }

    async fn find_object_store_credential(
        &self,
        access_key: &str,
    ) -> Result<types::ObjectStoreCredential> {
        Ok(self.client.find_object_store_credential(access_key).await?)
    }

    async fn list_firewalls(&self) -> Result<Vec<types::Firewall>> {
        Ok(self.client.list_firewalls().await?)
    }

    async fn find_firewall(&self, search: &str) -> Result<types::Firewall> {
        Ok(self.client.find_firewall(search).await?)
    }

    async fn create_firewall(
        &self,
        request: &types::CreateFirewallRequest,
    ) -> Result<types::FirewallResult> {
        Ok(self.client.create_firewall(request).await?)
    }

    async fn update_firewall(
        &self,
        id: &str,
        request: &types::UpdateFirewallRequest,
    ) -> Result<types::FirewallResult> {
        Ok(self.client.update_firewall(id, request).await?)
    }

    async fn delete_firewall(&self, id: &str) -> Result<types::SimpleResponse> {
        Ok(self.client.delete_firewall(id).await?)
    }

    async fn list_firewall_rules(&self, firewall_id: &str) -> Result<Vec<types::FirewallRule>> {
        Ok(self.client.list_firewall_rules(firewall_id).await?)
    }

    async fn create_firewall_rule(
        &self,
        firewall_id: &str,
        request: &types::CreateFirewallRuleRequest,
    ) -> Result<types::FirewallRule> {
        Ok(self.client.create_firewall_rule(firewall_id, request).await?)
    }

    async fn delete_firewall_rule(
        &self,
        firewall_id: &str,
        rule_id: &str,
    ) -> Result<types::SimpleResponse> {
        Ok(self.client.delete_firewall_rule(firewall_id, rule_id).await?)
    }

    async fn find_network(&self, search: &str) -> Result<types::Network> {
        Ok(self.client.find_network(search).await?)
    }

    async fn default_network(&self) -> Result<types::Network> {
        Ok(self.client.default_network().await?)
    }
}

/// Production clock implementation
pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn duration_from_millis(&self, millis: u64) -> Duration {
        Duration::from_millis(millis)
    }
}

/// Production async runtime
pub struct RealAsyncRuntime;

#[async_trait]
impl AsyncRuntime for RealAsyncRuntime {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
