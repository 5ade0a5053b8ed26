//! Firewall and firewall rule commands

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use stratus_common::{OutputWriter, styled};
use stratus_runtime::ApiError;
use stratus_runtime::api_client::types;
use stratus_runtime::deps::{CloudApiClient, MessageStyle, UserInterface};

use crate::context::CommandContext;
use crate::validation::{
    parse_action, parse_direction, parse_protocol, validate_cidrs, validate_ports,
};

/// Fields printed by `firewall list`
const FIREWALL_FIELDS: &[&str] = &[
    "id",
    "name",
    "network_id",
    "rules_count",
    "instance_count",
    "cluster_count",
    "loadbalancer_count",
];

/// Fields printed by `firewall create`, `update` and `remove`
const NAMED_FIELDS: &[&str] = &["id", "name"];

/// Fields printed by `rule list` and `rule create`
const RULE_FIELDS: &[&str] = &[
    "id",
    "direction",
    "protocol",
    "start_port",
    "end_port",
    "action",
    "cidr",
    "label",
];

/// Fields printed by `rule remove`
const REMOVED_RULE_FIELDS: &[&str] = &["id", "firewall_id"];

/// Dependencies for the firewall commands
pub struct FirewallDependencies {
    /// User interface for output and interaction
    pub ui: Arc<dyn UserInterface>,
    /// Provider API client
    pub api_client: Arc<dyn CloudApiClient>,
}

/// Flags for `firewall create`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateFirewallConfig {
    /// Firewall name
    pub name: String,
    /// Network ID or name; the region's default network when unset
    pub network: Option<String>,
    /// Whether the provider should add its default rules
    pub create_rules: Option<bool>,
}

/// Flags for `firewall rule create`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateFirewallRuleConfig {
    /// Firewall ID or name
    pub firewall: String,
    /// tcp, udp or icmp
    pub protocol: String,
    /// First port
    pub start_port: Option<String>,
    /// Last port; defaults to the start port
    pub end_port: Option<String>,
    /// CIDR blocks, repeated or comma separated
    pub cidr: Vec<String>,
    /// ingress or egress
    pub direction: Option<String>,
    /// allow or deny
    pub action: Option<String>,
    /// Display label
    pub label: Option<String>,
}

fn confirm(prompt: &str, ctx: &CommandContext, deps: &FirewallDependencies) -> Result<bool> {
    if ctx.yes || !deps.ui.is_interactive() {
        return Ok(true);
    }
    let confirmed = deps.ui.prompt_confirm(prompt, false)?;
    if !confirmed {
        deps.ui
            .print_styled("Operation aborted.", MessageStyle::Yellow);
    }
    Ok(confirmed)
}

fn rules_writer(rules: &[types::FirewallRule]) -> OutputWriter {
    let mut writer = OutputWriter::new();
    for rule in rules {
        writer.start_line();
        writer.append_with_label("id", "ID", &rule.id);
        writer.append("direction", &rule.direction);
        writer.append("protocol", &rule.protocol);
        writer.append("start_port", &rule.start_port);
        writer.append("end_port", &rule.end_port);
        writer.append("action", &rule.action);
        writer.append_with_label("cidr", "CIDR", rule.cidr.join(", "));
        writer.append("label", rule.label.as_deref().unwrap_or_default());
    }
    writer
}

/// Execute `firewall list`
pub async fn list_with_deps(
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    ctx.check_fields(FIREWALL_FIELDS)?;
    ctx.region()?;
    let firewalls = deps.api_client.list_firewalls().await?;
    debug!(count = firewalls.len(), "Listed firewalls");

    if firewalls.is_empty() && ctx.is_human() {
        deps.ui
            .print_styled("No firewalls found.", MessageStyle::Yellow);
        return Ok(());
    }

    let mut writer = OutputWriter::new();
    for firewall in &firewalls {
        writer.start_line();
        writer.append_with_label("id", "ID", &firewall.id);
        writer.append("name", &firewall.name);
        writer.append_with_label("network_id", "Network ID", &firewall.network_id);
        writer.append_with_label("rules_count", "Rules", firewall.rules_count.to_string());
        writer.append_with_label(
            "instance_count",
            "Instances",
            firewall.instance_count.to_string(),
        );
        writer.append_with_label(
            "cluster_count",
            "Clusters",
            firewall.cluster_count.to_string(),
        );
        writer.append_with_label(
            "loadbalancer_count",
            "Load Balancers",
            firewall.loadbalancer_count.to_string(),
        );
    }
    writer.write_list(&ctx.output, deps.ui.as_ref())
}

/// Execute `firewall create`
pub async fn create_with_deps(
    config: CreateFirewallConfig,
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    ctx.check_fields(NAMED_FIELDS)?;
    let region = ctx.region()?.to_string();

    let network = match config.network.as_deref() {
        Some(search) => deps.api_client.find_network(search).await?,
        None => deps.api_client.default_network().await?,
    };
    debug!(network_id = %network.id, "Resolved firewall network");

    let request = types::CreateFirewallRequest {
        name: config.name,
        region,
        network_id: network.id,
        create_rules: config.create_rules,
    };
    let firewall = deps.api_client.create_firewall(&request).await?;
    info!(id = %firewall.id, name = %firewall.name, "Firewall created");

    if ctx.is_human() {
        deps.ui.print(&format!(
            "Created a firewall called {} with ID {}",
            styled(&firewall.name, MessageStyle::Green),
            styled(&firewall.id, MessageStyle::Green)
        ));
        return Ok(());
    }
    OutputWriter::with_pairs([("id", firewall.id), ("name", firewall.name)])
        .write_single(&ctx.output, deps.ui.as_ref())
}

/// Execute `firewall update`, which renames a firewall
pub async fn update_with_deps(
    search: &str,
    new_name: &str,
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    ctx.check_fields(NAMED_FIELDS)?;
    let region = ctx.region()?.to_string();
    let existing = deps.api_client.find_firewall(search).await?;

    let request = types::UpdateFirewallRequest {
        name: new_name.to_string(),
        region,
    };
    let updated = deps
        .api_client
        .update_firewall(&existing.id, &request)
        .await?;
    info!(id = %existing.id, from = %existing.name, to = new_name, "Firewall renamed");

    if ctx.is_human() {
        deps.ui.print(&format!(
            "The firewall {} ({}) has been renamed to {}",
            existing.name,
            existing.id,
            styled(new_name, MessageStyle::Green)
        ));
        return Ok(());
    }
    let name = if updated.name.is_empty() {
        new_name.to_string()
    } else {
        updated.name
    };
    OutputWriter::with_pairs([("id", existing.id), ("name", name)])
        .write_single(&ctx.output, deps.ui.as_ref())
}

/// Execute `firewall remove`
pub async fn remove_with_deps(
    searches: &[String],
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    ctx.check_fields(NAMED_FIELDS)?;
    ctx.region()?;

    let mut firewalls = Vec::with_capacity(searches.len());
    for search in searches {
        firewalls.push(deps.api_client.find_firewall(search).await?);
    }

    let names = firewalls
        .iter()
        .map(|firewall| firewall.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let (noun, verb) = if firewalls.len() == 1 {
        ("firewall", "has")
    } else {
        ("firewalls", "have")
    };

    let prompt = format!("Are you sure you want to delete the {noun} {names}?");
    if !confirm(&prompt, ctx, deps)? {
        return Ok(());
    }

    let mut writer = OutputWriter::new();
    for firewall in &firewalls {
        deps.api_client.delete_firewall(&firewall.id).await?;
        info!(id = %firewall.id, "Firewall deleted");
        writer.start_line();
        writer.append_with_label("id", "ID", &firewall.id);
        writer.append("name", &firewall.name);
    }

    if ctx.is_human() {
        deps.ui.print_styled(
            &format!("The {noun} {names} {verb} been deleted"),
            MessageStyle::Success,
        );
        return Ok(());
    }
    writer.write_list(&ctx.output, deps.ui.as_ref())
}

/// Execute `firewall rule list`
pub async fn rule_list_with_deps(
    firewall: &str,
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    ctx.check_fields(RULE_FIELDS)?;
    ctx.region()?;
    let firewall = deps.api_client.find_firewall(firewall).await?;
    let rules = deps.api_client.list_firewall_rules(&firewall.id).await?;

    if rules.is_empty() && ctx.is_human() {
        deps.ui.print_styled(
            &format!("The firewall {} has no rules.", firewall.name),
            MessageStyle::Yellow,
        );
        return Ok(());
    }

    rules_writer(&rules).write_list(&ctx.output, deps.ui.as_ref())
}

/// Execute `firewall rule create`
///
/// All flags are checked before the firewall is looked up.
pub async fn rule_create_with_deps(
    config: CreateFirewallRuleConfig,
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    let protocol = parse_protocol(&config.protocol)?;
    let ports = validate_ports(
        protocol,
        config.start_port.as_deref(),
        config.end_port.as_deref(),
    )?;
    let cidr = validate_cidrs(&config.cidr)?;
    let direction = parse_direction(config.direction.as_deref())?;
    let action = parse_action(config.action.as_deref())?;
    ctx.check_fields(RULE_FIELDS)?;
    let region = ctx.region()?.to_string();

    let firewall = deps.api_client.find_firewall(&config.firewall).await?;
    let request = types::CreateFirewallRuleRequest {
        protocol: protocol.as_str().to_string(),
        start_port: ports.map(|range| range.start.to_string()),
        end_port: ports.map(|range| range.end.to_string()),
        cidr,
        direction: direction.as_str().to_string(),
        action: action.as_str().to_string(),
        label: config.label.filter(|label| !label.is_empty()),
        region,
    };
    let rule = deps
        .api_client
        .create_firewall_rule(&firewall.id, &request)
        .await?;
    info!(id = %rule.id, firewall_id = %firewall.id, "Firewall rule created");

    if ctx.is_human() {
        let ports = match ports {
            Some(range) if range.start == range.end => format!(" on port {}", range.start),
            Some(range) => format!(" on ports {}-{}", range.start, range.end),
            None => String::new(),
        };
        deps.ui.print(&format!(
            "Created {} {} rule{ports} for firewall {} with ID {}",
            direction.as_str(),
            protocol.as_str(),
            firewall.name,
            styled(&rule.id, MessageStyle::Green)
        ));
        return Ok(());
    }
    rules_writer(std::slice::from_ref(&rule)).write_single(&ctx.output, deps.ui.as_ref())
}

/// Execute `firewall rule remove`
pub async fn rule_remove_with_deps(
    firewall: &str,
    rule_id: &str,
    ctx: &CommandContext,
    deps: &Arc<FirewallDependencies>,
) -> Result<()> {
    ctx.check_fields(REMOVED_RULE_FIELDS)?;
    ctx.region()?;
    let firewall = deps.api_client.find_firewall(firewall).await?;
    let rules = deps.api_client.list_firewall_rules(&firewall.id).await?;
    let rule = rules
        .iter()
        .find(|rule| rule.id == rule_id)
        .ok_or_else(|| ApiError::ZeroMatches {
            kind: "firewall rule",
            search: rule_id.to_string(),
        })?;

    let prompt = format!(
        "Are you sure you want to delete the rule {} from firewall {}?",
        rule.id, firewall.name
    );
    if !confirm(&prompt, ctx, deps)? {
        return Ok(());
    }

    deps.api_client
        .delete_firewall_rule(&firewall.id, &rule.id)
        .await?;
    info!(id = %rule.id, firewall_id = %firewall.id, "Firewall rule deleted");

    if ctx.is_human() {
        deps.ui.print_styled(
            &format!(
                "The firewall rule {} has been deleted from {}",
                rule.id, firewall.name
            ),
            MessageStyle::Success,
        );
        return Ok(());
    }
    OutputWriter::with_pairs([("id", rule.id.as_str()), ("firewall_id", firewall.id.as_str())])
        .write_single(&ctx.output, deps.ui.as_ref())
}

#[cfg(test)]
#[path = "firewall_tests.rs"]
mod tests;
