use anyhow::Result;
use sitestack::{AzureProvider, Config, Context, StaticSiteOptions, StaticSiteStack};
use sitestack_core::OsEnv;
use sitestack_file_read_tokio::TokioFileRead;
use sitestack_http_send_reqwest::ReqwestHttpSend;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    // Wire real file, http and env implementations into the context.
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    // Subscription, tenant and client settings come from AZURE_* variables.
    let config = Config::default().from_env(&ctx);
    let provider = Arc::new(AzureProvider::new(ctx.clone(), config)?);

    // Declare the site: resource group, storage account, static website
    // hosting and the index document.
    let stack = StaticSiteStack::declare(ctx, provider, StaticSiteOptions::default())?;

    // Apply and print the exports. The storage key is rendered redacted.
    let outputs = stack.up().await?;
    print!("{outputs}");

    Ok(())
}
