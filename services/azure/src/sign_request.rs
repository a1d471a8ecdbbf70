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
use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use sitestack_core::hash::{base64_decode, base64_hmac_sha256};
use sitestack_core::time::{format_http_date, now, DateTime};
use sitestack_core::{Context, Error, Result, SignRequest, SigningRequest};

/// RequestSigner for the two authentication schemes the provider uses:
/// bearer tokens on Azure Resource Manager and Shared Key on the storage
/// data plane.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
#[derive(Debug)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid("credential is required"));
        };

        let mut ctx = SigningRequest::build(req)?;

        match cred {
            Credential::BearerToken { token, .. } => {
                ctx.headers
                    .insert(X_MS_DATE, format_http_date(now()).parse()?);
                ctx.headers.insert(header::AUTHORIZATION, {
                    let mut value: HeaderValue = format!("Bearer {token}").parse()?;
                    value.set_sensitive(true);
                    value
                });
            }
            Credential::SharedKey {
                account_name,
                account_key,
            } => {
                let now_time = self.time.unwrap_or_else(now);
                let string_to_sign = string_to_sign(&mut ctx, account_name, now_time)?;
                let key = base64_decode(account_key).map_err(|e| {
                    Error::credential_invalid("account key is not valid base64").with_source(e)
                })?;
                let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());

                ctx.headers.insert(header::AUTHORIZATION, {
                    let mut value: HeaderValue =
                        format!("SharedKey {account_name}:{signature}").parse()?;
                    value.set_sensitive(true);
                    value
                });
            }
        }

        ctx.apply(req)
    }
}

/// Construct the string to sign for Shared Key authorization.
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
fn string_to_sign(
    ctx: &mut SigningRequest,
    account_name: &str,
    now_time: DateTime,
) -> Result<String> {
    let content_md5 = http::header::HeaderName::from_static("content-md5");

    let mut s = String::with_capacity(256);
    fn line(s: &mut String, v: &str) {
        s.push_str(v);
        s.push('\n');
    }

    line(&mut s, ctx.method.as_str());
    line(&mut s, ctx.header_get_or_default(&header::CONTENT_ENCODING)?);
    line(&mut s, ctx.header_get_or_default(&header::CONTENT_LANGUAGE)?);
    let content_length = ctx.header_get_or_default(&header::CONTENT_LENGTH)?;
    line(
        &mut s,
        if content_length == "0" {
            ""
        } else {
            content_length
        },
    );
    line(&mut s, ctx.header_get_or_default(&content_md5)?);
    line(&mut s, ctx.header_get_or_default(&header::CONTENT_TYPE)?);
    line(&mut s, ctx.header_get_or_default(&header::DATE)?);
    line(
        &mut s,
        ctx.header_get_or_default(&header::IF_MODIFIED_SINCE)?,
    );
    line(&mut s, ctx.header_get_or_default(&header::IF_MATCH)?);
    line(&mut s, ctx.header_get_or_default(&header::IF_NONE_MATCH)?);
    line(
        &mut s,
        ctx.header_get_or_default(&header::IF_UNMODIFIED_SINCE)?,
    );
    line(&mut s, ctx.header_get_or_default(&header::RANGE)?);
    line(&mut s, &canonicalize_header(ctx, now_time)?);
    s.push_str(&canonicalize_resource(ctx, account_name));

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_header(ctx: &mut SigningRequest, now_time: DateTime) -> Result<String> {
    ctx.headers
        .insert(X_MS_DATE, format_http_date(now_time).parse()?);

    Ok(SigningRequest::header_to_string(
        ctx.header_to_vec_with_prefix("x-ms-"),
        ":",
        "\n",
    ))
}

/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(ctx: &mut SigningRequest, account_name: &str) -> String {
    if ctx.query.is_empty() {
        return format!("/{}{}", account_name, ctx.path);
    }

    let query = ctx
        .query
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();

    format!(
        "/{}{}\n{}",
        account_name,
        ctx.path,
        SigningRequest::query_to_percent_decoded_string(query, ":", "\n")
    )
}
