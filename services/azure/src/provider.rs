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

//! The Azure provider client.
//!
//! Each method is one opaque provider call: the request/response shapes are
//! owned by Azure, this client only moves them over the `Context` seams.
//! Management-plane calls are signed with a cached bearer token, data-plane
//! calls with the account's shared key, fetched once per account through
//! the key listing.

use crate::constants::*;
use crate::types::{
    AccountKind, ResourceGroup, SkuName, StorageAccount, StorageAccountKey, StorageEndpoints,
    StorageServiceProperties,
};
use crate::{ClientSecretCredentialProvider, Config, Credential, RequestSigner};
use bytes::Bytes;
use http::{header, Method, StatusCode};
use log::debug;
use serde::Deserialize;
use serde_json::json;
use sitestack_core::{Context, Error, Result, SignRequest, Signer};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// How long to wait between provisioning-state polls.
const PROVISION_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// How many polls before giving up on a storage account becoming ready.
const PROVISION_POLL_ATTEMPTS: u32 = 90;

/// Client for the Azure operations a static-website stack needs.
#[derive(Debug)]
pub struct AzureProvider {
    ctx: Context,
    config: Config,
    subscription_id: String,
    location: String,
    arm_signer: Signer<Credential>,
    /// Shared keys already fetched, per account. Data-plane calls reuse
    /// them instead of listing keys again.
    account_keys: Mutex<HashMap<String, String>>,
}

impl AzureProvider {
    /// Create a provider from a config.
    ///
    /// Requires `subscription_id` and `location`; authentication fields may
    /// come from the environment via [`Config::from_env`].
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let subscription_id = config
            .subscription_id
            .clone()
            .ok_or_else(|| Error::config_invalid("subscription_id is required"))?;
        let location = config
            .location
            .clone()
            .ok_or_else(|| Error::config_invalid("location is required"))?;

        let arm_signer = Signer::new(
            ctx.clone(),
            ClientSecretCredentialProvider::new(config.clone()),
            RequestSigner::new(),
        );

        Ok(Self {
            ctx,
            config,
            subscription_id,
            location,
            arm_signer,
            account_keys: Mutex::new(HashMap::new()),
        })
    }

    /// Create (or update) a resource group.
    pub async fn create_resource_group(&self, name: &str) -> Result<ResourceGroup> {
        let url = format!(
            "{}/subscriptions/{}/resourcegroups/{}?api-version={}",
            self.config.management_endpoint(),
            self.subscription_id,
            name,
            RESOURCE_GROUP_API_VERSION
        );
        let body = json!({ "location": self.location });

        let resp = self.arm_send(Method::PUT, &url, Some(body)).await?;
        let group: ResourceGroup = serde_json::from_slice(resp.body()).map_err(|e| {
            Error::unexpected("failed to parse resource group response").with_source(e)
        })?;

        debug!("created resource group {}", group.name);
        Ok(group)
    }

    /// Create a storage account and wait until it is provisioned.
    ///
    /// ARM provisions storage accounts asynchronously; this polls the
    /// provisioning state a bounded number of times. Polling is completion
    /// tracking, not retry: any rejected call still fails immediately.
    pub async fn create_storage_account(
        &self,
        resource_group: &str,
        name: &str,
        sku: SkuName,
        kind: AccountKind,
    ) -> Result<StorageAccount> {
        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}?api-version={}",
            self.config.management_endpoint(),
            self.subscription_id,
            resource_group,
            name,
            STORAGE_ACCOUNT_API_VERSION
        );
        let body = json!({
            "location": self.location,
            "sku": { "name": sku.as_str() },
            "kind": kind.as_str(),
        });

        let resp = self.arm_send(Method::PUT, &url, Some(body)).await?;
        if let Some(account) = parse_ready_account(resp.body())? {
            debug!("storage account {} ready", account.name);
            return Ok(account);
        }

        for attempt in 1..=PROVISION_POLL_ATTEMPTS {
            tokio::time::sleep(PROVISION_POLL_INTERVAL).await;

            let resp = self.arm_send(Method::GET, &url, None).await?;
            if let Some(account) = parse_ready_account(resp.body())? {
                debug!("storage account {} ready", account.name);
                return Ok(account);
            }
            debug!("storage account {name} still provisioning (attempt {attempt})");
        }

        Err(Error::unexpected(format!(
            "storage account {name} did not finish provisioning in time"
        )))
    }

    /// Enable static-website hosting on an account.
    ///
    /// Returns the name of the container the service serves content from.
    pub async fn enable_static_website(
        &self,
        resource_group: &str,
        account: &str,
        index_document: &str,
    ) -> Result<String> {
        let cred = self.shared_key_for(resource_group, account).await?;

        let xml = quick_xml::se::to_string(&StorageServiceProperties::static_website(
            index_document,
        ))
        .map_err(|e| {
            Error::unexpected("failed to serialize service properties").with_source(e)
        })?;
        let body = format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>{xml}");

        let url = format!(
            "https://{account}.{BLOB_ENDPOINT_SUFFIX}/?restype=service&comp=properties"
        );
        let req = http::Request::builder()
            .method(Method::PUT)
            .uri(&url)
            .header(X_MS_VERSION, STORAGE_API_VERSION)
            .header(header::CONTENT_TYPE, "application/xml")
            .header(header::CONTENT_LENGTH, body.len().to_string())
            .body(Bytes::from(body))?;

        let resp = self.data_send(&cred, req).await?;
        if !resp.status().is_success() {
            return Err(reject("enable static website", &resp));
        }

        // The service serves from a well-known container; it still has to
        // be created before blobs can land in it.
        let url = format!(
            "https://{account}.{BLOB_ENDPOINT_SUFFIX}/{WEB_CONTAINER}?restype=container"
        );
        let req = http::Request::builder()
            .method(Method::PUT)
            .uri(&url)
            .header(X_MS_VERSION, STORAGE_API_VERSION)
            .header(header::CONTENT_LENGTH, "0")
            .body(Bytes::new())?;

        let resp = self.data_send(&cred, req).await?;
        match resp.status() {
            s if s.is_success() => {}
            // Re-applying an unchanged declaration finds the container in place.
            StatusCode::CONFLICT => debug!("container {WEB_CONTAINER} already exists"),
            _ => return Err(reject("create web container", &resp)),
        }

        debug!("static website enabled on {account}");
        Ok(WEB_CONTAINER.to_string())
    }

    /// Upload one blob into a container.
    pub async fn put_blob(
        &self,
        resource_group: &str,
        account: &str,
        container: &str,
        blob_name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let cred = self.shared_key_for(resource_group, account).await?;

        let url = format!("https://{account}.{BLOB_ENDPOINT_SUFFIX}/{container}/{blob_name}");
        let req = http::Request::builder()
            .method(Method::PUT)
            .uri(&url)
            .header(X_MS_VERSION, STORAGE_API_VERSION)
            .header(X_MS_BLOB_TYPE, "BlockBlob")
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, content.len().to_string())
            .body(Bytes::from(content))?;

        let resp = self.data_send(&cred, req).await?;
        if !resp.status().is_success() {
            return Err(reject("put blob", &resp));
        }

        debug!("uploaded blob {container}/{blob_name} to {account}");
        Ok(())
    }

    /// List the access keys of a storage account, in provider order.
    pub async fn list_account_keys(
        &self,
        resource_group: &str,
        account: &str,
    ) -> Result<Vec<StorageAccountKey>> {
        let url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}/listKeys?api-version={}",
            self.config.management_endpoint(),
            self.subscription_id,
            resource_group,
            account,
            STORAGE_ACCOUNT_API_VERSION
        );

        let resp = self.arm_send(Method::POST, &url, None).await?;
        let listed: ListKeysResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse key listing").with_source(e))?;

        Ok(listed.keys)
    }

    /// Send a management-plane request, signed with the cached bearer token.
    async fn arm_send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<http::Response<Bytes>> {
        let payload = match &body {
            Some(v) => Bytes::from(
                serde_json::to_vec(v)
                    .map_err(|e| Error::unexpected("failed to encode body").with_source(e))?,
            ),
            None => Bytes::new(),
        };

        let req = http::Request::builder()
            .method(method)
            .uri(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)?;

        let (mut parts, payload) = req.into_parts();
        self.arm_signer.sign(&mut parts).await?;
        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, payload))
            .await?;

        if !resp.status().is_success() {
            return Err(reject(url, &resp));
        }
        Ok(resp)
    }

    /// Send a data-plane request, signed with the account's shared key.
    async fn data_send(
        &self,
        cred: &Credential,
        req: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>> {
        let (mut parts, payload) = req.into_parts();
        RequestSigner::new()
            .sign_request(&self.ctx, &mut parts, Some(cred))
            .await?;
        self.ctx
            .http_send(http::Request::from_parts(parts, payload))
            .await
    }

    /// Shared-key credential for an account, fetched through the key
    /// listing on first use.
    async fn shared_key_for(&self, resource_group: &str, account: &str) -> Result<Credential> {
        if let Some(key) = self
            .account_keys
            .lock()
            .expect("lock poisoned")
            .get(account)
        {
            return Ok(Credential::with_shared_key(account, key));
        }

        let keys = self.list_account_keys(resource_group, account).await?;
        let first = keys
            .first()
            .ok_or_else(|| Error::unexpected(format!("account {account} has no keys")))?;

        self.account_keys
            .lock()
            .expect("lock poisoned")
            .insert(account.to_string(), first.value.clone());

        Ok(Credential::with_shared_key(account, &first.value))
    }
}

/// Surface a non-success provider response unmodified.
fn reject(operation: &str, resp: &http::Response<Bytes>) -> Error {
    Error::provider_rejected(format!(
        "{operation} failed with status {}: {}",
        resp.status(),
        String::from_utf8_lossy(resp.body())
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArmStorageAccount {
    name: String,
    properties: Option<ArmStorageAccountProperties>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArmStorageAccountProperties {
    provisioning_state: Option<String>,
    primary_endpoints: Option<StorageEndpoints>,
}

#[derive(Deserialize)]
struct ListKeysResponse {
    keys: Vec<StorageAccountKey>,
}

/// Parse a storage account body; `Ok(None)` while provisioning is pending.
fn parse_ready_account(body: &[u8]) -> Result<Option<StorageAccount>> {
    // A 202 Accepted comes with an empty body.
    if body.is_empty() {
        return Ok(None);
    }

    let account: ArmStorageAccount = serde_json::from_slice(body)
        .map_err(|e| Error::unexpected("failed to parse storage account response").with_source(e))?;

    let Some(properties) = account.properties else {
        return Ok(None);
    };

    match properties.provisioning_state.as_deref() {
        Some("Succeeded") => {
            let primary_endpoints = properties.primary_endpoints.ok_or_else(|| {
                Error::unexpected("provisioned storage account has no endpoints")
            })?;
            Ok(Some(StorageAccount {
                name: account.name,
                primary_endpoints,
            }))
        }
        Some("Failed") | Some("Canceled") => Err(Error::provider_rejected(format!(
            "storage account {} provisioning {}",
            account.name,
            properties.provisioning_state.as_deref().unwrap_or("failed")
        ))),
        _ => Ok(None),
    }
}
