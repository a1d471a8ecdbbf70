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
use sitestack_core::utils::Redact;
use sitestack_core::Context;
use std::fmt::{Debug, Formatter};

/// Config carries everything the Azure provider needs to know about the
/// target subscription and how to authenticate against it.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `subscription_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_SUBSCRIPTION_ID`]
    pub subscription_id: Option<String>,
    /// `tenant_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_TENANT_ID`]
    pub tenant_id: Option<String>,
    /// `client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `client_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_CLIENT_SECRET`]
    pub client_secret: Option<String>,
    /// Region new resources are created in.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AZURE_LOCATION`]
    pub location: Option<String>,
    /// Microsoft Entra authority used for the token round-trip.
    ///
    /// Defaults to the public cloud authority.
    pub authority_host: Option<String>,
    /// Azure Resource Manager endpoint.
    ///
    /// Defaults to the public cloud endpoint.
    pub management_endpoint: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_deref().map(Redact::from),
            )
            .field("location", &self.location)
            .field("authority_host", &self.authority_host)
            .field("management_endpoint", &self.management_endpoint)
            .finish()
    }
}

impl Config {
    /// Load config values from the context's environment.
    ///
    /// Values already set on the config take precedence over the
    /// environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.subscription_id.is_none() {
            self.subscription_id = envs.get(AZURE_SUBSCRIPTION_ID).cloned();
        }
        if self.tenant_id.is_none() {
            self.tenant_id = envs.get(AZURE_TENANT_ID).cloned();
        }
        if self.client_id.is_none() {
            self.client_id = envs.get(AZURE_CLIENT_ID).cloned();
        }
        if self.client_secret.is_none() {
            self.client_secret = envs.get(AZURE_CLIENT_SECRET).cloned();
        }
        if self.location.is_none() {
            self.location = envs.get(AZURE_LOCATION).cloned();
        }
        if self.authority_host.is_none() {
            self.authority_host = envs.get(AZURE_AUTHORITY_HOST).cloned();
        }

        self
    }

    /// The authority host, falling back to the public cloud.
    pub fn authority_host(&self) -> &str {
        self.authority_host
            .as_deref()
            .unwrap_or(DEFAULT_AUTHORITY_HOST)
    }

    /// The management endpoint, falling back to the public cloud.
    pub fn management_endpoint(&self) -> &str {
        self.management_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_MANAGEMENT_ENDPOINT)
    }
}
