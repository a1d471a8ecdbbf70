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

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use pretty_assertions::assert_eq;
use sitestack_azure::{AccountKind, AzureProvider, Config, SkuName};
use sitestack_core::hash::base64_encode;
use sitestack_core::{Context, ErrorKind, HttpSend, Result};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

/// Routes requests by URL fragment and records everything it sees.
struct RouterHttpSend {
    routes: Vec<(&'static str, StatusCode, &'static str)>,
    requests: Arc<Mutex<Vec<(http::request::Parts, Bytes)>>>,
}

impl Debug for RouterHttpSend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterHttpSend").finish_non_exhaustive()
    }
}

impl RouterHttpSend {
    fn new(routes: Vec<(&'static str, StatusCode, &'static str)>) -> Self {
        Self {
            routes,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the request log, valid after the router moves into a
    /// context.
    fn recorder(&self) -> Arc<Mutex<Vec<(http::request::Parts, Bytes)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl HttpSend for RouterHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let uri = req.uri().to_string();
        let route = self
            .routes
            .iter()
            .find(|(fragment, _, _)| uri.contains(fragment))
            .copied();

        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push((parts, body));

        let (_, status, body) = route.unwrap_or(("", StatusCode::NOT_FOUND, "no route"));
        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap())
    }
}

fn test_config() -> Config {
    Config {
        subscription_id: Some("sub-1".to_string()),
        tenant_id: Some("tenant-1".to_string()),
        client_id: Some("client-1".to_string()),
        client_secret: Some("secret-1".to_string()),
        location: Some("westeurope".to_string()),
        ..Default::default()
    }
}

const TOKEN_BODY: &str = r#"{"access_token": "arm-token", "expires_in": 3600, "token_type": "Bearer"}"#;

#[tokio::test]
async fn test_create_resource_group() {
    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        (
            "/resourcegroups/rg-site",
            StatusCode::CREATED,
            r#"{"id": "/subscriptions/sub-1/resourceGroups/rg-site", "name": "rg-site", "location": "westeurope"}"#,
        ),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    let group = provider.create_resource_group("rg-site").await.unwrap();

    assert_eq!(group.name, "rg-site");
    assert_eq!(group.location, "westeurope");
}

#[tokio::test]
async fn test_create_storage_account_ready_on_first_response() {
    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        (
            "/storageAccounts/sasite",
            StatusCode::OK,
            r#"{
                "name": "sasite",
                "properties": {
                    "provisioningState": "Succeeded",
                    "primaryEndpoints": {
                        "blob": "https://sasite.blob.core.windows.net/",
                        "web": "https://sasite.z6.web.core.windows.net/"
                    }
                }
            }"#,
        ),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    let account = provider
        .create_storage_account("rg-site", "sasite", SkuName::StandardLrs, AccountKind::StorageV2)
        .await
        .unwrap();

    assert_eq!(account.name, "sasite");
    assert_eq!(
        account.primary_endpoints.web,
        "https://sasite.z6.web.core.windows.net/"
    );
}

#[tokio::test]
async fn test_list_account_keys_preserves_order() {
    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        (
            "/listKeys",
            StatusCode::OK,
            r#"{"keys": [
                {"keyName": "key1", "value": "Zmlyc3Qta2V5", "permissions": "FULL"},
                {"keyName": "key2", "value": "c2Vjb25kLWtleQ==", "permissions": "FULL"}
            ]}"#,
        ),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    let keys = provider.list_account_keys("rg-site", "sasite").await.unwrap();

    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].key_name, "key1");
    assert_eq!(keys[0].value, "Zmlyc3Qta2V5");
}

#[tokio::test]
async fn test_enable_static_website_returns_web_container() {
    // The key listing must hand back valid base64 so the data-plane
    // requests can be signed.
    let account_key = base64_encode(b"data-plane-key");
    let keys_body: &'static str = Box::leak(
        format!(r#"{{"keys": [{{"keyName": "key1", "value": "{account_key}"}}]}}"#)
            .into_boxed_str(),
    );

    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        ("/listKeys", StatusCode::OK, keys_body),
        ("restype=service&comp=properties", StatusCode::ACCEPTED, ""),
        ("restype=container", StatusCode::CREATED, ""),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    let container = provider
        .enable_static_website("rg-site", "sasite", "index.html")
        .await
        .unwrap();

    assert_eq!(container, "$web");
}

#[tokio::test]
async fn test_enable_static_website_tolerates_existing_container() {
    let account_key = base64_encode(b"data-plane-key");
    let keys_body: &'static str = Box::leak(
        format!(r#"{{"keys": [{{"keyName": "key1", "value": "{account_key}"}}]}}"#)
            .into_boxed_str(),
    );

    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        ("/listKeys", StatusCode::OK, keys_body),
        ("restype=service&comp=properties", StatusCode::ACCEPTED, ""),
        ("restype=container", StatusCode::CONFLICT, "ContainerAlreadyExists"),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    let container = provider
        .enable_static_website("rg-site", "sasite", "index.html")
        .await
        .unwrap();

    assert_eq!(container, "$web");
}

#[tokio::test]
async fn test_put_blob_signs_and_uploads() {
    let account_key = base64_encode(b"data-plane-key");
    let keys_body: &'static str = Box::leak(
        format!(r#"{{"keys": [{{"keyName": "key1", "value": "{account_key}"}}]}}"#)
            .into_boxed_str(),
    );

    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        ("/listKeys", StatusCode::OK, keys_body),
        ("/$web/index.html", StatusCode::CREATED, ""),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    provider
        .put_blob(
            "rg-site",
            "sasite",
            "$web",
            "index.html",
            b"<html></html>".to_vec(),
            "text/html",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_call_surfaces_provider_error() {
    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        (
            "/resourcegroups/rg-site",
            StatusCode::FORBIDDEN,
            r#"{"error": {"code": "AuthorizationFailed"}}"#,
        ),
    ]);
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    let err = provider.create_resource_group("rg-site").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProviderRejected);
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn test_missing_subscription_is_config_error() {
    let config = Config {
        subscription_id: None,
        ..test_config()
    };

    let err = AzureProvider::new(Context::new(), config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_arm_requests_carry_bearer_token() {
    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        (
            "/resourcegroups/rg-site",
            StatusCode::OK,
            r#"{"name": "rg-site", "location": "westeurope"}"#,
        ),
    ]);
    let recorder = http.recorder();
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    provider.create_resource_group("rg-site").await.unwrap();

    let sent = recorder.lock().unwrap();
    // Token request first, then the signed ARM call.
    assert_eq!(sent.len(), 2);
    let (arm, _) = &sent[1];
    let authorization = arm.headers.get("authorization").unwrap().to_str().unwrap();
    assert_eq!(authorization, "Bearer arm-token");
}

#[tokio::test]
async fn test_data_plane_requests_carry_shared_key() {
    let account_key = base64_encode(b"data-plane-key");
    let keys_body: &'static str = Box::leak(
        format!(r#"{{"keys": [{{"keyName": "key1", "value": "{account_key}"}}]}}"#)
            .into_boxed_str(),
    );

    let http = RouterHttpSend::new(vec![
        ("oauth2/v2.0/token", StatusCode::OK, TOKEN_BODY),
        ("/listKeys", StatusCode::OK, keys_body),
        ("/$web/index.html", StatusCode::CREATED, ""),
    ]);
    let recorder = http.recorder();
    let ctx = Context::new().with_http_send(http);
    let provider = AzureProvider::new(ctx, test_config()).unwrap();

    provider
        .put_blob(
            "rg-site",
            "sasite",
            "$web",
            "index.html",
            b"<html></html>".to_vec(),
            "text/html",
        )
        .await
        .unwrap();

    let sent = recorder.lock().unwrap();
    let (upload, body) = sent.last().unwrap();
    assert_eq!(body.as_ref(), b"<html></html>");
    let authorization = upload
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(authorization.starts_with("SharedKey sasite:"));
    assert_eq!(upload.headers.get("x-ms-blob-type").unwrap(), "BlockBlob");
}

/// Live smoke test against a real subscription.
///
/// Set `SITESTACK_AZURE_LIVE_TEST=on` together with the `AZURE_*`
/// environment variables to run it; otherwise it is skipped.
#[tokio::test]
async fn test_live_resource_group_roundtrip() {
    let _ = dotenv::dotenv();
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new()
        .with_http_send(sitestack_http_send_reqwest::ReqwestHttpSend::default())
        .with_env(sitestack_core::OsEnv);

    if ctx.env_var("SITESTACK_AZURE_LIVE_TEST").unwrap_or_default() != "on" {
        return;
    }
    let config = Config::default().from_env(&ctx);
    let provider = AzureProvider::new(ctx, config).expect("config must be complete");

    let group = provider
        .create_resource_group("sitestack-live-test")
        .await
        .expect("resource group must be created");
    assert_eq!(group.name, "sitestack-live-test");
}
