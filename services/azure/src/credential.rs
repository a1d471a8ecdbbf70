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

use sitestack_core::time::{now, DateTime};
use sitestack_core::utils::Redact;
use sitestack_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential for the two Azure surfaces the provider talks to.
#[derive(Clone)]
pub enum Credential {
    /// OAuth bearer token for Azure Resource Manager calls.
    BearerToken {
        /// Bearer token.
        token: String,
        /// Expiration time for this credential.
        expires_on: Option<DateTime>,
    },
    /// Shared Key authentication for the storage data plane.
    SharedKey {
        /// Storage account name.
        account_name: String,
        /// Storage account key.
        account_key: String,
    },
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::BearerToken { token, expires_on } => f
                .debug_struct("Credential::BearerToken")
                .field("token", &Redact::from(token))
                .field("expires_on", expires_on)
                .finish(),
            Credential::SharedKey {
                account_name,
                account_key,
            } => f
                .debug_struct("Credential::SharedKey")
                .field("account_name", &Redact::from(account_name))
                .field("account_key", &Redact::from(account_key))
                .finish(),
        }
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        match self {
            Credential::BearerToken { token, expires_on } => {
                if token.is_empty() {
                    return false;
                }
                // Take 20s as buffer to avoid expiring mid-request.
                if let Some(expires) = expires_on {
                    *expires > now() + chrono::TimeDelta::try_seconds(20).expect("in bounds")
                } else {
                    true
                }
            }
            Credential::SharedKey {
                account_name,
                account_key,
            } => !account_name.is_empty() && !account_key.is_empty(),
        }
    }
}

impl Credential {
    /// Create a new credential with bearer token authentication.
    pub fn with_bearer_token(token: &str, expires_on: Option<DateTime>) -> Self {
        Self::BearerToken {
            token: token.to_string(),
            expires_on,
        }
    }

    /// Create a new credential with shared key authentication.
    pub fn with_shared_key(account_name: &str, account_key: &str) -> Self {
        Self::SharedKey {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
        }
    }
}
