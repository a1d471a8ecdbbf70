// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Core components for declaring cloud resource stacks.
//!
//! This crate provides the foundational types for the sitestack ecosystem:
//! the asynchronous value model resources expose, the registry of what a
//! stack declared, and the ambient capabilities (file, HTTP, environment)
//! everything else is built on.
//!
//! ## Overview
//!
//! - **Context**: a container holding implementations for file reading,
//!   HTTP sending, and environment access. Provider clients and stack
//!   declarations only ever touch these seams, never `reqwest` or
//!   `tokio::fs` directly.
//! - **Output**: a promise-like value declared synchronously and resolved
//!   asynchronously. Composing outputs is what orders resources: a resource
//!   consuming another's output is scheduled strictly after it resolves.
//! - **ResourceGraph**: a declaration-order record of declared resources and
//!   the attribute references between them.
//! - **Signing**: credential loading ([`ProvideCredential`]) and request
//!   signing ([`SignRequest`]) traits plus the caching [`Signer`], used by
//!   provider clients for their management- and data-plane round-trips.
//!
//! ## Example
//!
//! ```
//! use sitestack_core::Output;
//!
//! # async fn example() -> sitestack_core::Result<()> {
//! // Declared now, resolved later.
//! let account = Output::from_value("sa1b2c3d4".to_string());
//! let endpoint = account.map(|name| format!("https://{name}.web.core.windows.net/"));
//! assert_eq!(
//!     endpoint.get().await?,
//!     "https://sa1b2c3d4.web.core.windows.net/"
//! );
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod output;
pub use output::{join, join3, Output};

mod graph;
pub use graph::{ResourceGraph, ResourceNode};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
