//! stratus - manage cloud firewalls and object stores from the terminal
//!
//! Every command resolves its settings (flags, environment, then
//! `~/.stratus/config.toml`), talks to the provider API and prints the result
//! as human readable text, JSON or selected fields.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stratus_commands::CommandContext;
use stratus_commands::commands::{firewall, objectstore};
use stratus_common::{RealUserInterface, styled};
use stratus_runtime::api_client::{ApiConfig, Client};
use stratus_runtime::deps::{
    AsyncRuntime, Clock, CloudApiClient, MessageStyle, RealAsyncRuntime, RealClock,
    RealCloudApiClient, UserInterface,
};
use stratus_runtime::{Settings, SettingsOverrides};

mod cli;

use cli::{Cli, Command, CredentialCommand, FirewallCommand, ObjectStoreCommand, RuleCommand};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("error"),
        1 => EnvFilter::new("warn"),
        2 => EnvFilter::new("info"),
        3 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to start the async runtime: {e}"))
        .and_then(|runtime| {
            runtime.block_on(async {
                tokio::select! {
                    result = run(cli) => result,
                    _ = tokio::signal::ctrl_c() => Err(anyhow!("Interrupted")),
                }
            })
        });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", styled(&format!("Error: {e:#}"), MessageStyle::Error));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = SettingsOverrides {
        region: cli.region.clone(),
        api_url: cli.api_url.clone(),
    };
    let settings = Settings::from_environment(&overrides)?;
    tracing::debug!(?settings, "Resolved settings");

    let ctx = CommandContext::from_flags(
        settings.region.clone(),
        cli.output.as_str(),
        cli.fields.as_deref(),
        cli.pretty,
        cli.yes,
    )?;

    let client = Client::new(ApiConfig::from(&settings))?;
    let api_client = Arc::new(RealCloudApiClient::new(client)) as Arc<dyn CloudApiClient>;
    let ui = Arc::new(RealUserInterface) as Arc<dyn UserInterface>;

    match cli.command {
        Command::Objectstore { command } => {
            let deps = Arc::new(objectstore::ObjectStoreDependencies {
                ui,
                api_client,
                clock: Arc::new(RealClock) as Arc<dyn Clock>,
                async_runtime: Arc::new(RealAsyncRuntime) as Arc<dyn AsyncRuntime>,
            });
            run_objectstore(command, &ctx, &deps).await
        }
        Command::Firewall { command } => {
            let deps = Arc::new(firewall::FirewallDependencies { ui, api_client });
            run_firewall(command, &ctx, &deps).await
        }
    }
}

async fn run_objectstore(
    command: ObjectStoreCommand,
    ctx: &CommandContext,
    deps: &Arc<objectstore::ObjectStoreDependencies>,
) -> Result<()> {
    match command {
        ObjectStoreCommand::List => objectstore::list_with_deps(ctx, deps).await,
        ObjectStoreCommand::Show { object_store } => {
            objectstore::show_with_deps(&object_store, ctx, deps).await
        }
        ObjectStoreCommand::Create {
            name,
            size,
            max_objects,
            wait,
            wait_timeout,
        } => {
            objectstore::create_with_deps(
                objectstore::CreateObjectStoreConfig {
                    name,
                    size_gb: size,
                    max_objects,
                    wait,
                    wait_timeout,
                },
                ctx,
                deps,
            )
            .await
        }
        ObjectStoreCommand::Update {
            object_store,
            size,
            wait,
            wait_timeout,
        } => {
            objectstore::update_with_deps(
                objectstore::UpdateObjectStoreConfig {
                    search: object_store,
                    size_gb: size,
                    wait,
                    wait_timeout,
                },
                ctx,
                deps,
            )
            .await
        }
        ObjectStoreCommand::Remove { object_stores } => {
            objectstore::remove_with_deps(&object_stores, ctx, deps).await
        }
        ObjectStoreCommand::Credential {
            command: CredentialCommand::Secret { access_key },
        } => objectstore::credential_secret_with_deps(&access_key, ctx, deps).await,
    }
}

async fn run_firewall(
    command: FirewallCommand,
    ctx: &CommandContext,
    deps: &Arc<firewall::FirewallDependencies>,
) -> Result<()> {
    match command {
        FirewallCommand::List => firewall::list_with_deps(ctx, deps).await,
        FirewallCommand::Create {
            name,
            network,
            create_rules,
        } => {
            firewall::create_with_deps(
                firewall::CreateFirewallConfig {
                    name,
                    network,
                    create_rules,
                },
                ctx,
                deps,
            )
            .await
        }
        FirewallCommand::Update {
            firewall: target,
            new_name,
        } => firewall::update_with_deps(&target, &new_name, ctx, deps).await,
        FirewallCommand::Remove { firewalls } => {
            firewall::remove_with_deps(&firewalls, ctx, deps).await
        }
        FirewallCommand::Rule { command } => match command {
            RuleCommand::List { firewall: target } => {
                firewall::rule_list_with_deps(&target, ctx, deps).await
            }
            RuleCommand::Create {
                firewall: target,
                protocol,
                start_port,
                end_port,
                cidr,
                direction,
                action,
                label,
            } => {
                firewall::rule_create_with_deps(
                    firewall::CreateFirewallRuleConfig {
                        firewall: target,
                        protocol,
                        start_port,
                        end_port,
                        cidr,
                        direction,
                        action,
                        label,
                    },
                    ctx,
                    deps,
                )
                .await
            }
            RuleCommand::Remove {
                firewall: target,
                rule_id,
            } => firewall::rule_remove_with_deps(&target, &rule_id, ctx, deps).await,
        },
    }
}
