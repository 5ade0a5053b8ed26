//! Object store commands

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use stratus_common::{OutputWriter, format_elapsed, styled};
use stratus_runtime::api_client::types;
use stratus_runtime::deps::{AsyncRuntime, Clock, CloudApiClient, MessageStyle, UserInterface};

use crate::context::CommandContext;
use crate::validation::validate_object_store_size;
use crate::wait::{WaitDependencies, WaitOptions, WaitRequest, wait_for};

/// Dependencies for the object store commands
pub struct ObjectStoreDependencies {
    /// User interface for output and interaction
    pub ui: Arc<dyn UserInterface>,
    /// Provider API client
    pub api_client: Arc<dyn CloudApiClient>,
    /// Clock for measuring waits
    pub clock: Arc<dyn Clock>,
    /// Async runtime for sleeping between polls
    pub async_runtime: Arc<dyn AsyncRuntime>,
}

impl ObjectStoreDependencies {
    fn wait_deps(&self) -> WaitDependencies {
        WaitDependencies {
            ui: Arc::clone(&self.ui),
            clock: Arc::clone(&self.clock),
            async_runtime: Arc::clone(&self.async_runtime),
        }
    }
}

/// Fields printed by `list` and `show`
const STORE_FIELDS: &[&str] = &[
    "id",
    "name",
    "size",
    "max_objects",
    "objectstore_endpoint",
    "bucket_url",
    "access_key",
    "status",
];

/// Fields printed by `create` and `update`
const SUMMARY_FIELDS: &[&str] = &["id", "name", "access_key"];

/// Fields printed by `remove`
const REMOVED_FIELDS: &[&str] = &["id", "name"];

/// Fields printed by `credential secret`
const CREDENTIAL_FIELDS: &[&str] = &["access_key", "secret_key"];

/// Flags for `objectstore create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateObjectStoreConfig {
    /// Store name
    pub name: String,
    /// Maximum size in GB
    pub size_gb: u64,
    /// Maximum number of objects; unlimited when unset
    pub max_objects: Option<u64>,
    /// Block until the store is ready
    pub wait: bool,
    /// Give up waiting after this many seconds
    pub wait_timeout: Option<u64>,
}

/// Flags for `objectstore update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateObjectStoreConfig {
    /// ID or name of the store
    pub search: String,
    /// New maximum size in GB
    pub size_gb: u64,
    /// Block until the store is ready again
    pub wait: bool,
    /// Give up waiting after this many seconds
    pub wait_timeout: Option<u64>,
}

fn is_ready(status: &str) -> bool {
    status.eq_ignore_ascii_case(types::OBJECT_STORE_READY)
}

fn is_failed(status: &str) -> bool {
    status.eq_ignore_ascii_case(types::OBJECT_STORE_FAILED)
}

async fn wait_until_ready(
    store: &types::ObjectStore,
    message: &str,
    wait_timeout: Option<u64>,
    deps: &ObjectStoreDependencies,
) -> Result<(types::ObjectStore, String)> {
    let request = WaitRequest {
        id: &store.id,
        message,
        is_terminal: &is_ready,
        is_failed: Some(&is_failed),
        options: WaitOptions::with_timeout_secs(wait_timeout),
    };

    let api = Arc::clone(&deps.api_client);
    let id = store.id.clone();
    let waited = wait_for(&request, &deps.wait_deps(), move || {
        let api = Arc::clone(&api);
        let id = id.clone();
        async move { api.get_object_store(&id).await }
    })
    .await?;

    Ok((waited.resource, format_elapsed(waited.elapsed)))
}

fn summary_writer(store: &types::ObjectStore) -> OutputWriter {
    let mut writer = OutputWriter::new();
    writer.start_line();
    writer.append_with_label("id", "ID", &store.id);
    writer.append("name", &store.name);
    writer.append("access_key", store.access_key_id());
    writer
}

fn detail_writer(stores: &[types::ObjectStore]) -> OutputWriter {
    let mut writer = OutputWriter::new();
    for store in stores {
        writer.start_line();
        writer.append_with_label("id", "ID", &store.id);
        writer.append("name", &store.name);
        writer.append_with_label("size", "Size (GB)", store.max_size.to_string());
        writer.append(
            "max_objects",
            store
                .max_objects
                .map(|count| count.to_string())
                .unwrap_or_default(),
        );
        writer.append(
            "objectstore_endpoint",
            store.objectstore_endpoint.as_deref().unwrap_or_default(),
        );
        writer.append_with_label(
            "bucket_url",
            "Bucket URL",
            store.bucket_url.as_deref().unwrap_or_default(),
        );
        writer.append("access_key", store.access_key_id());
        writer.append("status", &store.status);
    }
    writer
}

/// Execute `objectstore list`
pub async fn list_with_deps(
    ctx: &CommandContext,
    deps: &Arc<ObjectStoreDependencies>,
) -> Result<()> {
    ctx.check_fields(STORE_FIELDS)?;
    ctx.region()?;
    let stores = deps.api_client.list_object_stores().await?;
    debug!(count = stores.len(), "Listed object stores");

    if stores.is_empty() && ctx.is_human() {
        deps.ui
            .print_styled("No object stores found.", MessageStyle::Yellow);
        return Ok(());
    }

    detail_writer(&stores).write_list(&ctx.output, deps.ui.as_ref())
}

/// Execute `objectstore show`
pub async fn show_with_deps(
    search: &str,
    ctx: &CommandContext,
    deps: &Arc<ObjectStoreDependencies>,
) -> Result<()> {
    ctx.check_fields(STORE_FIELDS)?;
    ctx.region()?;
    let store = deps.api_client.find_object_store(search).await?;
    detail_writer(std::slice::from_ref(&store)).write_single(&ctx.output, deps.ui.as_ref())
}

/// Execute `objectstore create`
pub async fn create_with_deps(
    config: CreateObjectStoreConfig,
    ctx: &CommandContext,
    deps: &Arc<ObjectStoreDependencies>,
) -> Result<()> {
    let size_gb = validate_object_store_size(config.size_gb)?;
    ctx.check_fields(SUMMARY_FIELDS)?;
    let region = ctx.region()?.to_string();

    let request = types::CreateObjectStoreRequest {
        name: config.name.clone(),
        max_size_gb: size_gb,
        max_objects: config.max_objects,
        region: region.clone(),
    };
    let mut store = deps.api_client.create_object_store(&request).await?;
    info!(id = %store.id, name = %store.name, size_gb, "Object store requested");

    let mut elapsed = None;
    if config.wait {
        let objects = config
            .max_objects
            .map(|count| format!(", max objects {count}"))
            .unwrap_or_default();
        let message = format!(
            "Creating an object store with max size {size_gb}GB{objects} called {}...",
            store.name
        );
        let (ready, took) = wait_until_ready(&store, &message, config.wait_timeout, deps).await?;
        store = ready;
        elapsed = Some(took);
    }

    if !ctx.is_human() {
        return summary_writer(&store).write_single(&ctx.output, deps.ui.as_ref());
    }

    let name = styled(&store.name, MessageStyle::Green);
    let region = styled(&region, MessageStyle::Green);
    if let Some(elapsed) = elapsed {
        let access_key = styled(store.access_key_id(), MessageStyle::Green);
        deps.ui
            .print(&format!("Created object store {name} in {region} in {elapsed}"));
        deps.ui.print(&format!(
            "Created default admin credentials, access key is {access_key}, this will be deleted if the object store is deleted."
        ));
        deps.ui.print(&format!(
            "To access the secret key run: stratus objectstore credential secret --access-key={access_key}"
        ));
    } else {
        deps.ui
            .print(&format!("Creating object store {name} in {region}"));
        deps.ui.print(&format!(
            "To check the status of the object store run: stratus objectstore show {}",
            store.name
        ));
    }
    Ok(())
}

/// Execute `objectstore update`
pub async fn update_with_deps(
    config: UpdateObjectStoreConfig,
    ctx: &CommandContext,
    deps: &Arc<ObjectStoreDependencies>,
) -> Result<()> {
    let size_gb = validate_object_store_size(config.size_gb)?;
    ctx.check_fields(SUMMARY_FIELDS)?;
    let region = ctx.region()?.to_string();

    let existing = deps.api_client.find_object_store(&config.search).await?;
    let request = types::UpdateObjectStoreRequest {
        max_size_gb: size_gb,
        region,
    };
    let mut store = deps
        .api_client
        .update_object_store(&existing.id, &request)
        .await?;
    info!(id = %store.id, size_gb, "Object store resize requested");

    if config.wait {
        let message = format!("Resizing object store {} to {size_gb}GB...", store.name);
        let (ready, _) = wait_until_ready(&store, &message, config.wait_timeout, deps).await?;
        store = ready;
    }

    if !ctx.is_human() {
        return summary_writer(&store).write_single(&ctx.output, deps.ui.as_ref());
    }

    deps.ui.print(&format!(
        "The object store {} ({}) was resized to {size_gb}GB",
        styled(&store.name, MessageStyle::Green),
        store.id
    ));
    Ok(())
}

/// Execute `objectstore remove`
///
/// Every name is resolved before anything is deleted.
pub async fn remove_with_deps(
    searches: &[String],
    ctx: &CommandContext,
    deps: &Arc<ObjectStoreDependencies>,
) -> Result<()> {
    ctx.check_fields(REMOVED_FIELDS)?;
    ctx.region()?;

    let mut stores = Vec::with_capacity(searches.len());
    for search in searches {
        stores.push(deps.api_client.find_object_store(search).await?);
    }

    let names = stores
        .iter()
        .map(|store| store.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let (noun, verb) = if stores.len() == 1 {
        ("object store", "has")
    } else {
        ("object stores", "have")
    };

    if !ctx.yes && deps.ui.is_interactive() {
        let prompt = format!("Are you sure you want to delete the {noun} {names}?");
        if !deps.ui.prompt_confirm(&prompt, false)? {
            deps.ui
                .print_styled("Operation aborted.", MessageStyle::Yellow);
            return Ok(());
        }
    }

    let mut writer = OutputWriter::new();
    for store in &stores {
        deps.api_client.delete_object_store(&store.id).await?;
        info!(id = %store.id, "Object store deleted");
        writer.start_line();
        writer.append_with_label("id", "ID", &store.id);
        writer.append("name", &store.name);
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

/// Execute `objectstore credential secret`
pub async fn credential_secret_with_deps(
    access_key: &str,
    ctx: &CommandContext,
    deps: &Arc<ObjectStoreDependencies>,
) -> Result<()> {
    ctx.check_fields(CREDENTIAL_FIELDS)?;
    ctx.region()?;

    let credential = deps
        .api_client
        .find_object_store_credential(access_key)
        .await?;
    debug!(id = %credential.id, "Found object store credential");

    if ctx.is_human() {
        deps.ui.print(&format!(
            "The secret key for access key {} is {}",
            credential.access_key_id,
            styled(&credential.secret_access_key, MessageStyle::Green)
        ));
        return Ok(());
    }
    OutputWriter::with_pairs([
        ("access_key", credential.access_key_id.as_str()),
        ("secret_key", credential.secret_access_key.as_str()),
    ])
    .write_single(&ctx.output, deps.ui.as_ref())
}

#[cfg(test)]
#[path = "objectstore_tests.rs"]
mod tests;
