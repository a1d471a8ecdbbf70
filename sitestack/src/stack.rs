use crate::{FileAsset, OutputValue, Provision, StackOutputs};
use log::debug;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sitestack_azure::{AccountKind, SkuName};
use sitestack_core::{join3, Context, Error, Output, ResourceGraph, Result};
use std::sync::Arc;

/// Export name of the static-website endpoint.
pub const STATIC_ENDPOINT: &str = "StaticEndpoint";
/// Export name of the primary storage access key.
pub const PRIMARY_STORAGE_KEY: &str = "PrimaryStorageKey";

/// Logical name of the static-website resource.
const WEBSITE_LOGICAL_NAME: &str = "StaticWebsite";

/// Storage account names are lowercase alphanumeric, at most 24 characters.
const ACCOUNT_NAME_MAX: usize = 24;
const NAME_SUFFIX_LEN: usize = 8;

/// What to deploy: names, content and storage shape of the site.
#[derive(Debug, Clone)]
pub struct StaticSiteOptions {
    /// Logical name of the resource group.
    pub resource_group: String,
    /// Logical name of the storage account.
    pub storage_account: String,
    /// Document the website serves at the root, also used as the blob name.
    pub index_document: String,
    /// Local file uploaded as the index document.
    pub content_path: String,
    /// Content type the blob is served with.
    pub content_type: String,
    /// Replication tier of the storage account.
    pub sku: SkuName,
    /// Kind of the storage account.
    pub kind: AccountKind,
}

impl Default for StaticSiteOptions {
    fn default() -> Self {
        Self {
            resource_group: "resourceGroup".to_string(),
            storage_account: "sa".to_string(),
            index_document: "index.html".to_string(),
            content_path: "app/index.html".to_string(),
            content_type: "text/html".to_string(),
            sku: SkuName::StandardLrs,
            kind: AccountKind::StorageV2,
        }
    }
}

/// A declared static-website deployment.
///
/// [`StaticSiteStack::declare`] builds the resource graph and the output
/// chains without talking to the provider; [`StaticSiteStack::up`] resolves
/// them. Each provider call runs at most once no matter how many exported
/// values derive from it.
#[derive(Debug)]
pub struct StaticSiteStack {
    graph: ResourceGraph,
    blob: Output<()>,
    static_endpoint: Output<String>,
    primary_storage_key: Output<String>,
}

impl StaticSiteStack {
    /// Declare the stack: a resource group, a storage account inside it,
    /// static-website hosting on the account and the index document blob.
    ///
    /// Physical resource names derive from the logical names with a random
    /// suffix, so repeated deployments do not collide.
    pub fn declare(
        ctx: Context,
        provider: Arc<dyn Provision>,
        options: StaticSiteOptions,
    ) -> Result<Self> {
        let mut graph = ResourceGraph::new();
        graph.register(
            options.resource_group.as_str(),
            "azure:resources:ResourceGroup",
            &[],
        )?;
        graph.register(
            options.storage_account.as_str(),
            "azure:storage:StorageAccount",
            &[options.resource_group.as_str()],
        )?;
        graph.register(
            WEBSITE_LOGICAL_NAME,
            "azure:storage:StorageAccountStaticWebsite",
            &[options.storage_account.as_str()],
        )?;
        graph.register(
            options.index_document.as_str(),
            "azure:storage:Blob",
            &[options.storage_account.as_str(), WEBSITE_LOGICAL_NAME],
        )?;

        let rg_physical = suffixed_name(&options.resource_group);
        let sa_physical = account_name(&options.storage_account);
        debug!("declared stack: group {rg_physical}, account {sa_physical}");

        let resource_group = {
            let provider = provider.clone();
            let name = rg_physical.clone();
            Output::new(async move { provider.create_resource_group(&name).await })
        };

        let storage_account = {
            let provider = provider.clone();
            let name = sa_physical;
            let (sku, kind) = (options.sku, options.kind);
            resource_group.and_then(move |group| async move {
                provider
                    .create_storage_account(&group.name, &name, sku, kind)
                    .await
            })
        };

        let website = {
            let provider = provider.clone();
            let group = rg_physical.clone();
            let index_document = options.index_document.clone();
            storage_account.and_then(move |account| async move {
                provider
                    .enable_static_website(&group, &account.name, &index_document)
                    .await
            })
        };

        let content = {
            let asset = FileAsset::new(options.content_path.clone());
            let ctx = ctx.clone();
            Output::new(async move { asset.read(&ctx).await })
        };

        let blob = {
            let provider = provider.clone();
            let group = rg_physical.clone();
            let blob_name = options.index_document.clone();
            let content_type = options.content_type.clone();
            join3(&storage_account, &website, &content).and_then(
                move |(account, container, bytes)| async move {
                    provider
                        .put_blob(
                            &group,
                            &account.name,
                            &container,
                            &blob_name,
                            bytes,
                            &content_type,
                        )
                        .await
                },
            )
        };

        let static_endpoint = storage_account.map(|account| account.primary_endpoints.web);

        let primary_storage_key = {
            let group = rg_physical;
            storage_account
                .and_then(move |account| async move {
                    let keys = provider.list_account_keys(&group, &account.name).await?;
                    let first = keys.into_iter().next().ok_or_else(|| {
                        Error::resolution_failed(format!("account {} has no keys", account.name))
                    })?;
                    Ok(first.value)
                })
                .secret()
        };

        Ok(Self {
            graph,
            blob,
            static_endpoint,
            primary_storage_key,
        })
    }

    /// The declared resources and the references connecting them.
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// The website endpoint of the storage account.
    ///
    /// Resolvable on its own: it does not depend on the key listing or the
    /// blob upload.
    pub fn static_endpoint(&self) -> Output<String> {
        self.static_endpoint.clone()
    }

    /// The first access key of the storage account, tagged secret.
    pub fn primary_storage_key(&self) -> Output<String> {
        self.primary_storage_key.clone()
    }

    /// Resolve one exported value by name, independently of the other
    /// exports.
    ///
    /// `StaticEndpoint` and `PrimaryStorageKey` sit on separate output
    /// chains, so a failure resolving one leaves the other available.
    pub async fn resolve_output(&self, name: &str) -> Result<OutputValue> {
        match name {
            STATIC_ENDPOINT => Ok(OutputValue::plain(
                STATIC_ENDPOINT,
                self.static_endpoint.get().await?,
            )),
            PRIMARY_STORAGE_KEY => Ok(OutputValue::secret(
                PRIMARY_STORAGE_KEY,
                self.primary_storage_key.get().await?,
            )),
            _ => Err(Error::config_invalid(format!("unknown output: {name}"))),
        }
    }

    /// Deploy everything and collect the exported values.
    ///
    /// Resolving the blob upload drives the whole chain: resource group,
    /// storage account, website configuration, content upload.
    pub async fn up(&self) -> Result<StackOutputs> {
        self.blob.get().await?;

        let endpoint = self.static_endpoint.get().await?;
        let key = self.primary_storage_key.get().await?;
        debug!("stack is up, endpoint {endpoint}");

        Ok(StackOutputs::new(vec![
            OutputValue::plain(STATIC_ENDPOINT, endpoint),
            OutputValue::secret(PRIMARY_STORAGE_KEY, key),
        ]))
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NAME_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn suffixed_name(logical: &str) -> String {
    format!("{logical}{}", random_suffix())
}

/// Physical storage account name: lowercase alphanumeric from the logical
/// name, truncated so the random suffix fits the 24-character limit.
fn account_name(logical: &str) -> String {
    let mut name: String = logical
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .flat_map(char::to_lowercase)
        .collect();
    name.truncate(ACCOUNT_NAME_MAX - NAME_SUFFIX_LEN);
    name.push_str(&random_suffix());
    name
}
