//! Request and response types of the provider API

use serde::{Deserialize, Serialize};

/// Object store status while storage is being provisioned
pub const OBJECT_STORE_CREATING: &str = "creating";
/// Object store status once it can serve requests
pub const OBJECT_STORE_READY: &str = "ready";
/// Object store status when provisioning failed
pub const OBJECT_STORE_FAILED: &str = "failed";

/// Credentials attached to an object store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketOwner {
    /// Access key ID of the owning credential
    #[serde(default)]
    pub access_key_id: String,
    /// Credential name
    #[serde(default)]
    pub name: String,
    /// Credential ID
    #[serde(default)]
    pub credential_id: String,
}

/// An S3 compatible object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStore {
    /// Object store ID
    pub id: String,
    /// Object store name
    pub name: String,
    /// Maximum size in gigabytes
    #[serde(default)]
    pub max_size: u64,
    /// Maximum number of objects, when limited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<u64>,
    /// Owner credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_info: Option<BucketOwner>,
    /// S3 endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectstore_endpoint: Option<String>,
    /// Bucket URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_url: Option<String>,
    /// Provisioning status
    #[serde(default)]
    pub status: String,
}

impl ObjectStore {
    /// Access key ID of the owner, empty when the store has no owner yet
    pub fn access_key_id(&self) -> &str {
        self.owner_info
            .as_ref()
            .map_or("", |owner| owner.access_key_id.as_str())
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Current page, starting at 1
    pub page: u32,
    /// Page size
    pub per_page: u32,
    /// Total number of pages
    pub pages: u32,
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Body of `POST /v2/objectstores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateObjectStoreRequest {
    /// Object store name
    pub name: String,
    /// Maximum size in gigabytes
    pub max_size_gb: u64,
    /// Maximum number of objects; unlimited when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_objects: Option<u64>,
    /// Region to create the store in
    pub region: String,
}

/// Access key pair for object stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStoreCredential {
    /// Credential ID
    pub id: String,
    /// Credential name
    #[serde(default)]
    pub name: String,
    /// Access key ID
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key
    #[serde(default)]
    pub secret_access_key: String,
    /// Provisioning status
    #[serde(default)]
    pub status: String,
}

/// Body of `PUT /v2/objectstores/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateObjectStoreRequest {
    /// New maximum size in gigabytes
    pub max_size_gb: u64,
    /// Region the store lives in
    pub region: String,
}

/// A firewall rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Rule ID
    pub id: String,
    /// Owning firewall ID
    #[serde(default)]
    pub firewall_id: String,
    /// `tcp`, `udp` or `icmp`
    pub protocol: String,
    /// First port of the range
    #[serde(default)]
    pub start_port: String,
    /// Last port of the range
    #[serde(default)]
    pub end_port: String,
    /// Source (ingress) or destination (egress) networks
    #[serde(default)]
    pub cidr: Vec<String>,
    /// `ingress` or `egress`
    pub direction: String,
    /// Free form label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `allow` or `deny`
    #[serde(default)]
    pub action: String,
}

/// A firewall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firewall {
    /// Firewall ID
    pub id: String,
    /// Firewall name
    pub name: String,
    /// Number of rules
    #[serde(default)]
    pub rules_count: u32,
    /// Number of instances using the firewall
    #[serde(default)]
    pub instance_count: u32,
    /// Number of clusters using the firewall
    #[serde(default)]
    pub cluster_count: u32,
    /// Number of load balancers using the firewall
    #[serde(default)]
    pub loadbalancer_count: u32,
    /// Network the firewall belongs to
    #[serde(default)]
    pub network_id: String,
    /// Rules, only present on some endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<FirewallRule>>,
}

/// Body of `POST /v2/firewalls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFirewallRequest {
    /// Firewall name
    pub name: String,
    /// Region to create the firewall in
    pub region: String,
    /// Network the firewall is attached to
    pub network_id: String,
    /// Whether the default rule set should be created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_rules: Option<bool>,
}

/// Body of `PUT /v2/firewalls/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFirewallRequest {
    /// New firewall name
    pub name: String,
    /// Region the firewall lives in
    pub region: String,
}

/// Response to firewall create and update calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallResult {
    /// Firewall ID
    pub id: String,
    /// Firewall name
    #[serde(default)]
    pub name: String,
    /// Result string, `success` on success
    #[serde(default)]
    pub result: String,
}

/// Body of `POST /v2/firewalls/{id}/rules`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFirewallRuleRequest {
    /// `tcp`, `udp` or `icmp`
    pub protocol: String,
    /// First port of the range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_port: Option<String>,
    /// Last port of the range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_port: Option<String>,
    /// Networks the rule applies to
    pub cidr: Vec<String>,
    /// `ingress` or `egress`
    pub direction: String,
    /// `allow` or `deny`
    pub action: String,
    /// Free form label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Region the firewall lives in
    pub region: String,
}

/// A private network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Network ID
    pub id: String,
    /// Internal network name
    #[serde(default)]
    pub name: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Whether this is the region's default network
    #[serde(default)]
    pub default: bool,
}

/// Generic `{"result": "..."}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleResponse {
    /// Result string, `success` on success
    pub result: String,
}

impl SimpleResponse {
    /// Whether the server reported success
    pub fn is_success(&self) -> bool {
        self.result.eq_ignore_ascii_case("success") || self.result.eq_ignore_ascii_case("ok")
    }
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine readable code
    #[serde(default)]
    pub code: String,
    /// Human readable reason
    #[serde(default)]
    pub reason: String,
}
