use async_trait::async_trait;
use sitestack_azure::{
    AccountKind, AzureProvider, ResourceGroup, SkuName, StorageAccount, StorageAccountKey,
};
use sitestack_core::Result;
use std::fmt::Debug;

/// The provider operations a static-website stack drives.
///
/// [`AzureProvider`] is the production implementation; tests substitute
/// a recording fake.
#[async_trait]
pub trait Provision: Debug + Send + Sync + 'static {
    /// Create (or update) a resource group.
    async fn create_resource_group(&self, name: &str) -> Result<ResourceGroup>;

    /// Create a storage account inside a resource group and wait until it
    /// is provisioned.
    async fn create_storage_account(
        &self,
        resource_group: &str,
        name: &str,
        sku: SkuName,
        kind: AccountKind,
    ) -> Result<StorageAccount>;

    /// Enable static-website hosting; returns the container the service
    /// serves content from.
    async fn enable_static_website(
        &self,
        resource_group: &str,
        account: &str,
        index_document: &str,
    ) -> Result<String>;

    /// Upload one blob.
    async fn put_blob(
        &self,
        resource_group: &str,
        account: &str,
        container: &str,
        blob_name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// List the account's access keys, in provider order.
    async fn list_account_keys(
        &self,
        resource_group: &str,
        account: &str,
    ) -> Result<Vec<StorageAccountKey>>;
}

#[async_trait]
impl Provision for AzureProvider {
    async fn create_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        AzureProvider::create_resource_group(self, name).await
    }

    async fn create_storage_account(
        &self,
        resource_group: &str,
        name: &str,
        sku: SkuName,
        kind: AccountKind,
    ) -> Result<StorageAccount> {
        AzureProvider::create_storage_account(self, resource_group, name, sku, kind).await
    }

    async fn enable_static_website(
        &self,
        resource_group: &str,
        account: &str,
        index_document: &str,
    ) -> Result<String> {
        AzureProvider::enable_static_website(self, resource_group, account, index_document).await
    }

    async fn put_blob(
        &self,
        resource_group: &str,
        account: &str,
        container: &str,
        blob_name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        AzureProvider::put_blob(
            self,
            resource_group,
            account,
            container,
            blob_name,
            content,
            content_type,
        )
        .await
    }

    async fn list_account_keys(
        &self,
        resource_group: &str,
        account: &str,
    ) -> Result<Vec<StorageAccountKey>> {
        AzureProvider::list_account_keys(self, resource_group, account).await
    }
}
