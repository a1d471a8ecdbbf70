use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sitestack::{
    Provision, StaticSiteOptions, StaticSiteStack, PRIMARY_STORAGE_KEY, STATIC_ENDPOINT,
};
use sitestack_azure::{
    AccountKind, ResourceGroup, SkuName, StorageAccount, StorageAccountKey, StorageEndpoints,
};
use sitestack_core::{Context, Error, ErrorKind, Result};
use sitestack_file_read_tokio::TokioFileRead;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Records every provider call and answers with canned resources.
#[derive(Debug, Default)]
struct MockProvider {
    calls: Mutex<Vec<String>>,
    fail_key_listing: bool,
}

impl MockProvider {
    fn failing_key_listing() -> Self {
        Self {
            fail_key_listing: true,
            ..Default::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

fn endpoints(account: &str) -> StorageEndpoints {
    StorageEndpoints {
        blob: format!("https://{account}.blob.core.windows.net/"),
        web: format!("https://{account}.z6.web.core.windows.net/"),
        queue: None,
        table: None,
        file: None,
        dfs: None,
    }
}

#[async_trait]
impl Provision for MockProvider {
    async fn create_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        self.record(format!("create_resource_group:{name}"));
        Ok(ResourceGroup {
            name: name.to_string(),
            location: "westeurope".to_string(),
        })
    }

    async fn create_storage_account(
        &self,
        resource_group: &str,
        name: &str,
        sku: SkuName,
        kind: AccountKind,
    ) -> Result<StorageAccount> {
        self.record(format!(
            "create_storage_account:{resource_group}:{name}:{sku}:{kind}"
        ));
        Ok(StorageAccount {
            name: name.to_string(),
            primary_endpoints: endpoints(name),
        })
    }

    async fn enable_static_website(
        &self,
        resource_group: &str,
        account: &str,
        index_document: &str,
    ) -> Result<String> {
        self.record(format!(
            "enable_static_website:{resource_group}:{account}:{index_document}"
        ));
        Ok("$web".to_string())
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
        self.record(format!(
            "put_blob:{resource_group}:{account}:{container}:{blob_name}:{content_type}:{}",
            String::from_utf8_lossy(&content)
        ));
        Ok(())
    }

    async fn list_account_keys(
        &self,
        resource_group: &str,
        account: &str,
    ) -> Result<Vec<StorageAccountKey>> {
        self.record(format!("list_account_keys:{resource_group}:{account}"));
        if self.fail_key_listing {
            return Err(Error::resolution_failed("key listing unavailable"));
        }
        Ok(vec![
            StorageAccountKey {
                key_name: "key1".to_string(),
                value: "first-key-material".to_string(),
                permissions: Some("FULL".to_string()),
            },
            StorageAccountKey {
                key_name: "key2".to_string(),
                value: "second-key-material".to_string(),
                permissions: Some("FULL".to_string()),
            },
        ])
    }
}

/// Context whose file reads resolve against a real temporary site root.
fn site_context(content: &str) -> (Context, StaticSiteOptions) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.html");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();

    let options = StaticSiteOptions {
        content_path: path.to_string_lossy().into_owned(),
        ..Default::default()
    };

    // Keep the directory alive for the duration of the test.
    Box::leak(Box::new(dir));
    (Context::new().with_file_read(TokioFileRead), options)
}

#[tokio::test]
async fn test_up_deploys_every_resource_once() {
    let (ctx, options) = site_context("<html>hi</html>");
    let provider = Arc::new(MockProvider::default());

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();
    let outputs = stack.up().await.unwrap();

    assert_eq!(provider.count("create_resource_group:"), 1);
    assert_eq!(provider.count("create_storage_account:"), 1);
    assert_eq!(provider.count("enable_static_website:"), 1);
    assert_eq!(provider.count("put_blob:"), 1);
    assert_eq!(provider.count("list_account_keys:"), 1);
    assert_eq!(outputs.values().len(), 2);
}

#[tokio::test]
async fn test_endpoint_is_the_account_web_endpoint() {
    let (ctx, options) = site_context("<html></html>");
    let provider = Arc::new(MockProvider::default());

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();
    let outputs = stack.up().await.unwrap();

    let endpoint = outputs.get(STATIC_ENDPOINT).unwrap();
    assert!(!endpoint.is_secret());
    assert!(endpoint.value().starts_with("https://sa"));
    assert!(endpoint.value().ends_with(".z6.web.core.windows.net/"));
}

#[tokio::test]
async fn test_primary_key_is_first_key_and_secret() {
    let (ctx, options) = site_context("<html></html>");
    let provider = Arc::new(MockProvider::default());

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();
    assert!(stack.primary_storage_key().is_secret());

    let outputs = stack.up().await.unwrap();
    let key = outputs.get(PRIMARY_STORAGE_KEY).unwrap();
    assert!(key.is_secret());
    assert_eq!(key.value(), "first-key-material");
    // Redacted in every rendered form.
    assert!(!format!("{outputs:?}").contains("first-key-material"));
    assert!(!outputs.to_string().contains("first-key-material"));
}

#[tokio::test]
async fn test_blob_lands_in_the_website_container() {
    let (ctx, options) = site_context("<html>content</html>");
    let provider = Arc::new(MockProvider::default());

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();
    stack.up().await.unwrap();

    let put = provider
        .calls()
        .into_iter()
        .find(|c| c.starts_with("put_blob:"))
        .unwrap();
    assert!(put.contains(":$web:index.html:text/html:"), "{put}");
    assert!(put.ends_with("<html>content</html>"), "{put}");
}

#[tokio::test]
async fn test_account_is_created_in_the_resource_group() {
    let (ctx, options) = site_context("<html></html>");
    let provider = Arc::new(MockProvider::default());

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();
    stack.up().await.unwrap();

    let calls = provider.calls();
    let group = calls[0].strip_prefix("create_resource_group:").unwrap();
    let account = calls
        .iter()
        .find(|c| c.starts_with("create_storage_account:"))
        .unwrap();
    assert!(account.starts_with(&format!("create_storage_account:{group}:")));
    assert!(account.ends_with(":Standard_LRS:StorageV2"), "{account}");
}

#[tokio::test]
async fn test_identical_declarations_share_a_graph_shape() {
    let (ctx, options) = site_context("<html></html>");
    let provider = Arc::new(MockProvider::default());

    let a = StaticSiteStack::declare(ctx.clone(), provider.clone(), options.clone()).unwrap();
    let b = StaticSiteStack::declare(ctx, provider, options).unwrap();

    assert_eq!(a.graph(), b.graph());
    assert_eq!(a.graph().len(), 4);
    assert_eq!(
        a.graph().dependencies_of("index.html").unwrap(),
        &["sa".to_string(), "StaticWebsite".to_string()]
    );
}

#[tokio::test]
async fn test_key_failure_leaves_endpoint_resolvable() {
    let (ctx, options) = site_context("<html></html>");
    let provider = Arc::new(MockProvider::failing_key_listing());

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();

    let err = stack.primary_storage_key().get().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResolutionFailed);

    // The sibling output is untouched by the failure.
    let endpoint = stack.static_endpoint().get().await.unwrap();
    assert!(endpoint.contains(".z6.web.core.windows.net"));
    // The account was still only created once.
    assert_eq!(provider.count("create_storage_account:"), 1);
}

#[tokio::test]
async fn test_resolve_output_by_name() {
    let (ctx, options) = site_context("<html></html>");
    let provider = Arc::new(MockProvider::failing_key_listing());

    let stack = StaticSiteStack::declare(ctx, provider, options).unwrap();

    let endpoint = stack.resolve_output(STATIC_ENDPOINT).await.unwrap();
    assert!(!endpoint.is_secret());
    assert!(endpoint.value().contains(".z6.web.core.windows.net"));

    // The key export fails on its own without taking anything else down.
    assert!(stack.resolve_output(PRIMARY_STORAGE_KEY).await.is_err());

    let err = stack.resolve_output("NoSuchExport").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_missing_asset_fails_the_upload_only() {
    let provider = Arc::new(MockProvider::default());
    let ctx = Context::new().with_file_read(TokioFileRead);
    let options = StaticSiteOptions {
        content_path: "/nonexistent/site/index.html".to_string(),
        ..Default::default()
    };

    let stack = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap();

    let err = stack.up().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AssetInvalid);

    // The endpoint does not depend on the asset.
    let endpoint = stack.static_endpoint().get().await.unwrap();
    assert!(endpoint.contains(".z6.web.core.windows.net"));
    // No blob upload was attempted.
    assert_eq!(provider.count("put_blob:"), 0);
}

#[tokio::test]
async fn test_duplicate_logical_names_are_rejected_at_declare_time() {
    let provider = Arc::new(MockProvider::default());
    let ctx = Context::new();
    let options = StaticSiteOptions {
        resource_group: "site".to_string(),
        storage_account: "site".to_string(),
        ..Default::default()
    };

    let err = StaticSiteStack::declare(ctx, provider.clone(), options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    // Nothing was deployed.
    assert!(provider.calls().is_empty());
}
