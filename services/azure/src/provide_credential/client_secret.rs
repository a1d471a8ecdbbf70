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

use crate::constants::*;
use crate::{Config, Credential};
use async_trait::async_trait;
use sitestack_core::{Context, Error, ProvideCredential, Result};

/// Load an ARM bearer token via the client credentials flow.
///
/// Applications authenticate with a client ID and client secret against
/// their tenant's authority, scoped to Azure Resource Manager.
///
/// Reference: <https://learn.microsoft.com/en-us/azure/active-directory/develop/v2-oauth2-client-creds-grant-flow>
#[derive(Debug, Default, Clone)]
pub struct ClientSecretCredentialProvider {
    config: Config,
}

impl ClientSecretCredentialProvider {
    /// Create a new client secret provider from the given config.
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ClientSecretCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let tenant_id = match self
            .config
            .tenant_id
            .as_ref()
            .or_else(|| envs.get(AZURE_TENANT_ID))
        {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let client_id = match self
            .config
            .client_id
            .as_ref()
            .or_else(|| envs.get(AZURE_CLIENT_ID))
        {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let client_secret = match self
            .config
            .client_secret
            .as_ref()
            .or_else(|| envs.get(AZURE_CLIENT_SECRET))
        {
            Some(secret) if !secret.is_empty() => secret,
            _ => return Ok(None),
        };

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_host().trim_end_matches('/'),
            tenant_id
        );
        let scope = format!("{}/.default", self.config.management_endpoint());

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("scope", &scope)
            .append_pair("client_id", client_id)
            .append_pair("client_secret", client_secret)
            .append_pair("grant_type", "client_credentials")
            .finish();

        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(bytes::Bytes::from(body))
            .map_err(|e| {
                Error::unexpected("failed to build client secret request").with_source(e)
            })?;

        let resp = ctx.http_send(req).await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = String::from_utf8_lossy(resp.body());
            return Err(Error::credential_invalid(format!(
                "client secret request failed with status {status}: {body}"
            )));
        }

        let token: TokenResponse = serde_json::from_slice(resp.body()).map_err(|e| {
            Error::unexpected("failed to parse client secret response").with_source(e)
        })?;

        let expires_on = sitestack_core::time::now()
            + chrono::TimeDelta::try_seconds(token.expires_in as i64)
                .unwrap_or_else(|| chrono::TimeDelta::try_minutes(10).expect("in bounds"));

        Ok(Some(Credential::with_bearer_token(
            &token.access_token,
            Some(expires_on),
        )))
    }
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}
