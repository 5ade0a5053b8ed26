//! Test helper utilities and mock implementations for stratus-commands

use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use mockall::mock;

use stratus_runtime::api_client::types;
use stratus_runtime::deps::*;

pub use stratus_common::ui::TestUserInterface;

// Mock implementation of the CloudApiClient trait.
//
// # Example
//
// ```rust
// let mut api = MockCloudApiClientMock::new();
// api.expect_find_object_store()
//     .with(eq("backups"))
//     .times(1)
//     .returning(|_| Ok(object_store("os-1", "backups", "ready")));
// ```
mock! {
    pub CloudApiClientMock {}

    #[async_trait]
    impl CloudApiClient for CloudApiClientMock {
        async fn list_object_stores(&self) -> Result<Vec<types::ObjectStore>>;
        async fn get_object_store(&self, id: &str) -> Result<types::ObjectStore>;
        async fn find_object_store(&self, search: &str) -> Result<types::ObjectStore>;
        async fn create_object_store(
            &self,
            request: &types::CreateObjectStoreRequest,
        ) -> Result<types::ObjectStore>;
        async fn update_object_store(
            &self,
            id: &str,
            request: &types::UpdateObjectStoreRequest,
        ) -> Result<types::ObjectStore>;
        async fn delete_object_store(&self, id: &str) -> Result<types::SimpleResponse>;
        async fn find_object_store_credential(
            &self,
            access_key: &str,
        ) -> Result<types::ObjectStoreCredential>;
        async fn list_firewalls(&self) -> Result<Vec<types::Firewall>>;
        async fn find_firewall(&self, search: &str) -> Result<types::Firewall>;
        async fn create_firewall(
            &self,
            request: &types::CreateFirewallRequest,
        ) -> Result<types::FirewallResult>;
        async fn update_firewall(
            &self,
            id: &str,
            request: &types::UpdateFirewallRequest,
        ) -> Result<types::FirewallResult>;
        async fn delete_firewall(&self, id: &str) -> Result<types::SimpleResponse>;
        async fn list_firewall_rules(&self, firewall_id: &str) -> Result<Vec<types::FirewallRule>>;
        async fn create_firewall_rule(
            &self,
            firewall_id: &str,
            request: &types::CreateFirewallRuleRequest,
        ) -> Result<types::FirewallRule>;
        async fn delete_firewall_rule(
            &self,
            firewall_id: &str,
            rule_id: &str,
        ) -> Result<types::SimpleResponse>;
        async fn find_network(&self, search: &str) -> Result<types::Network>;
        async fn default_network(&self) -> Result<types::Network>;
    }
}

// Sleeps are counted through `expect_sleep().times(n)`.
mock! {
    pub AsyncRuntimeMock {}

    #[async_trait]
    impl AsyncRuntime for AsyncRuntimeMock {
        async fn sleep(&self, duration: Duration);
    }
}

/// Clock that advances by a fixed step every time `now` is read
pub struct StepClock {
    current: Mutex<Instant>,
    step: Duration,
}

impl StepClock {
    /// Clock starting now that moves `step` forward on every read
    pub fn new(step: Duration) -> Self {
        Self {
            current: Mutex::new(Instant::now()),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> Instant {
        let mut current = self.current.lock().unwrap();
        let now = *current;
        *current += self.step;
        now
    }

    fn duration_from_millis(&self, millis: u64) -> Duration {
        Duration::from_millis(millis)
    }
}

/// Object store fixture with a 500GB limit and access key `AKIA123`
pub fn object_store(id: &str, name: &str, status: &str) -> types::ObjectStore {
    types::ObjectStore {
        id: id.to_string(),
        name: name.to_string(),
        max_size: 500,
        max_objects: None,
        owner_info: Some(types::BucketOwner {
            access_key_id: "AKIA123".to_string(),
            name: format!("{name}-owner"),
            credential_id: "cred-1".to_string(),
        }),
        objectstore_endpoint: Some("objectstore.lon1.stratus.cloud".to_string()),
        bucket_url: Some(format!("https://{name}.objectstore.lon1.stratus.cloud")),
        status: status.to_string(),
    }
}

/// Credential fixture holding `access_key`
pub fn credential(access_key: &str, secret: &str) -> types::ObjectStoreCredential {
    types::ObjectStoreCredential {
        id: "cred-1".to_string(),
        name: "admin".to_string(),
        access_key_id: access_key.to_string(),
        secret_access_key: secret.to_string(),
        status: "ready".to_string(),
    }
}

/// Firewall fixture on network `net-1`
pub fn firewall(id: &str, name: &str) -> types::Firewall {
    types::Firewall {
        id: id.to_string(),
        name: name.to_string(),
        rules_count: 2,
        instance_count: 1,
        cluster_count: 0,
        loadbalancer_count: 0,
        network_id: "net-1".to_string(),
        rules: None,
    }
}

/// Single-port ingress tcp rule open to everyone
pub fn firewall_rule(id: &str, firewall_id: &str, start_port: &str) -> types::FirewallRule {
    types::FirewallRule {
        id: id.to_string(),
        firewall_id: firewall_id.to_string(),
        protocol: "tcp".to_string(),
        start_port: start_port.to_string(),
        end_port: start_port.to_string(),
        cidr: vec!["0.0.0.0/0".to_string()],
        direction: "ingress".to_string(),
        label: None,
        action: "allow".to_string(),
    }
}

/// Network fixture
pub fn network(id: &str, label: &str, default: bool) -> types::Network {
    types::Network {
        id: id.to_string(),
        name: format!("{label}-name"),
        label: label.to_string(),
        default,
    }
}

/// Successful delete response
pub fn success() -> types::SimpleResponse {
    types::SimpleResponse {
        result: "success".to_string(),
    }
}
