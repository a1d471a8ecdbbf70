//! Declarative static-website deployments on Azure.
//!
//! A stack is declared first and applied later: declaring builds a record
//! of the resources and promise-like [`Output`] values for everything the
//! provider will eventually report back, and [`StaticSiteStack::up`]
//! resolves those promises by driving the provider calls in dependency
//! order.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sitestack::{AzureProvider, Config, Context, StaticSiteOptions, StaticSiteStack};
//! use sitestack_file_read_tokio::TokioFileRead;
//! use sitestack_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn deploy() -> sitestack_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(sitestack_core::OsEnv);
//!
//! let config = Config::default().from_env(&ctx);
//! let provider = Arc::new(AzureProvider::new(ctx.clone(), config)?);
//!
//! let stack = StaticSiteStack::declare(ctx, provider, StaticSiteOptions::default())?;
//! let outputs = stack.up().await?;
//! println!("{outputs}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod asset;
pub use asset::FileAsset;

mod export;
pub use export::{OutputValue, StackOutputs};

mod provision;
pub use provision::Provision;

mod stack;
pub use stack::{StaticSiteOptions, StaticSiteStack, PRIMARY_STORAGE_KEY, STATIC_ENDPOINT};

pub use sitestack_azure::{AccountKind, AzureProvider, Config, SkuName};
pub use sitestack_core::{Context, Error, ErrorKind, Output, ResourceGraph, Result};
