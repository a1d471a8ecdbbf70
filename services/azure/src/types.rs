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

//! Wire-facing types for the resources the provider manages.

use serde::{Deserialize, Serialize};
use sitestack_core::utils::Redact;
use std::fmt::{Debug, Display, Formatter};

/// Replication tier of a storage account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkuName {
    /// Locally-redundant storage.
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    /// Geo-redundant storage.
    #[serde(rename = "Standard_GRS")]
    StandardGrs,
    /// Zone-redundant storage.
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    /// Read-access geo-redundant storage.
    #[serde(rename = "Standard_RAGRS")]
    StandardRagrs,
    /// Premium locally-redundant storage.
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
}

impl SkuName {
    /// The name ARM expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkuName::StandardLrs => "Standard_LRS",
            SkuName::StandardGrs => "Standard_GRS",
            SkuName::StandardZrs => "Standard_ZRS",
            SkuName::StandardRagrs => "Standard_RAGRS",
            SkuName::PremiumLrs => "Premium_LRS",
        }
    }
}

impl Display for SkuName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a storage account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountKind {
    /// General-purpose v2 account.
    StorageV2,
    /// Legacy general-purpose v1 account.
    Storage,
    /// Premium block blob account.
    BlockBlobStorage,
}

impl AccountKind {
    /// The name ARM expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::StorageV2 => "StorageV2",
            AccountKind::Storage => "Storage",
            AccountKind::BlockBlobStorage => "BlockBlobStorage",
        }
    }
}

impl Display for AccountKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provisioned resource group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceGroup {
    /// Resolved resource group name.
    pub name: String,
    /// Region the group lives in.
    pub location: String,
}

/// Endpoint bundle a storage account exposes once provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEndpoints {
    /// Blob service endpoint.
    pub blob: String,
    /// Static website endpoint.
    pub web: String,
    /// Queue service endpoint, absent on some account kinds.
    #[serde(default)]
    pub queue: Option<String>,
    /// Table service endpoint, absent on some account kinds.
    #[serde(default)]
    pub table: Option<String>,
    /// File service endpoint, absent on some account kinds.
    #[serde(default)]
    pub file: Option<String>,
    /// Data Lake endpoint, absent on some account kinds.
    #[serde(default)]
    pub dfs: Option<String>,
}

/// A provisioned storage account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccount {
    /// Resolved account name.
    pub name: String,
    /// Endpoint bundle, including the static-website endpoint.
    pub primary_endpoints: StorageEndpoints,
}

/// One access key of a storage account, as returned by the key listing.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountKey {
    /// Key slot name, e.g. `key1`.
    pub key_name: String,
    /// The key material. Sensitive; Debug output is redacted.
    pub value: String,
    /// Permissions the key grants, as reported by ARM.
    #[serde(default)]
    pub permissions: Option<String>,
}

impl Debug for StorageAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAccountKey")
            .field("key_name", &self.key_name)
            .field("value", &Redact::from(&self.value))
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Body of the data-plane service-properties request that turns on static
/// website hosting.
#[derive(Debug, Serialize)]
#[serde(rename = "StorageServiceProperties")]
pub struct StorageServiceProperties {
    #[serde(rename = "StaticWebsite")]
    pub(crate) static_website: StaticWebsite,
}

#[derive(Debug, Serialize)]
pub(crate) struct StaticWebsite {
    #[serde(rename = "Enabled")]
    pub(crate) enabled: bool,
    #[serde(rename = "IndexDocument")]
    pub(crate) index_document: String,
}

impl StorageServiceProperties {
    /// Properties enabling static website hosting with the given index
    /// document.
    pub fn static_website(index_document: &str) -> Self {
        Self {
            static_website: StaticWebsite {
                enabled: true,
                index_document: index_document.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sku_wire_names() {
        assert_eq!(SkuName::StandardLrs.as_str(), "Standard_LRS");
        assert_eq!(
            serde_json::to_string(&SkuName::StandardLrs).unwrap(),
            "\"Standard_LRS\""
        );
        assert_eq!(AccountKind::StorageV2.as_str(), "StorageV2");
    }

    #[test]
    fn test_endpoints_deserialize_from_arm_shape() {
        let body = r#"{
            "blob": "https://sa1.blob.core.windows.net/",
            "web": "https://sa1.z6.web.core.windows.net/",
            "queue": "https://sa1.queue.core.windows.net/",
            "table": "https://sa1.table.core.windows.net/"
        }"#;
        let endpoints: StorageEndpoints = serde_json::from_str(body).unwrap();
        assert_eq!(endpoints.web, "https://sa1.z6.web.core.windows.net/");
        assert_eq!(endpoints.file, None);
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key: StorageAccountKey = serde_json::from_str(
            r#"{"keyName": "key1", "value": "Eby8vdM02xNOcqFlqUwJPLlm", "permissions": "FULL"}"#,
        )
        .unwrap();
        let repr = format!("{key:?}");
        assert!(repr.contains("key1"));
        assert!(!repr.contains("Eby8vdM02xNOcqFlqUwJPLlm"));
    }

    #[test]
    fn test_static_website_properties_xml() {
        let body = StorageServiceProperties::static_website("index.html");
        let xml = quick_xml::se::to_string(&body).unwrap();
        assert_eq!(
            xml,
            "<StorageServiceProperties><StaticWebsite><Enabled>true</Enabled>\
             <IndexDocument>index.html</IndexDocument></StaticWebsite></StorageServiceProperties>"
        );
    }
}
