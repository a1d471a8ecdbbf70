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

use crate::Credential;
use async_trait::async_trait;
use sitestack_core::{Context, ProvideCredential, Result};

/// A provider that always returns the same credential.
///
/// Useful for tests and for callers that already hold a token or an account
/// key from elsewhere.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider around a fixed credential.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestSigner;
    use sitestack_core::Signer;

    #[tokio::test]
    async fn test_signer_with_static_credential() {
        let ctx = Context::new();
        let provider =
            StaticCredentialProvider::new(Credential::with_bearer_token("fixed-token", None));
        let signer = Signer::new(ctx, provider, RequestSigner::new());

        let req = http::Request::builder()
            .uri("https://management.azure.com/subscriptions/sub")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        signer.sign(&mut parts).await.unwrap();

        assert_eq!(
            parts.headers.get("authorization").unwrap(),
            "Bearer fixed-token"
        );
    }
}
