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

//! Azure provider support.
//!
//! This crate talks to two Azure surfaces:
//!
//! - Azure Resource Manager, for resource groups, storage accounts and key
//!   listing, authenticated with a bearer token from the client credentials
//!   flow.
//! - The Blob storage data plane, for static-website properties, containers
//!   and blob uploads, authenticated with Shared Key.
//!
//! [`AzureProvider`] bundles both behind the operations a static-website
//! stack needs.

#![warn(missing_docs)]

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{ClientSecretCredentialProvider, StaticCredentialProvider};

mod sign_request;
pub use sign_request::RequestSigner;

mod provider;
pub use provider::AzureProvider;

mod types;
pub use types::{
    AccountKind, ResourceGroup, SkuName, StorageAccount, StorageAccountKey, StorageEndpoints,
    StorageServiceProperties,
};

mod constants;
pub use constants::WEB_CONTAINER;
