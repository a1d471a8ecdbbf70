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

//! Shared constants for the Azure surfaces this crate talks to.

/// Header carrying the request timestamp on the storage data plane.
pub const X_MS_DATE: &str = "x-ms-date";
/// Header selecting the storage data-plane API version.
pub const X_MS_VERSION: &str = "x-ms-version";
/// Header selecting the blob type on upload.
pub const X_MS_BLOB_TYPE: &str = "x-ms-blob-type";

/// Storage data-plane API version sent with every request.
pub const STORAGE_API_VERSION: &str = "2023-01-03";
/// ARM API version for resource group operations.
pub const RESOURCE_GROUP_API_VERSION: &str = "2021-04-01";
/// ARM API version for storage account operations.
pub const STORAGE_ACCOUNT_API_VERSION: &str = "2023-01-01";

/// Default Microsoft Entra authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
/// Default Azure Resource Manager endpoint.
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
/// DNS suffix of the blob data plane in the public cloud.
pub const BLOB_ENDPOINT_SUFFIX: &str = "blob.core.windows.net";

/// The container the storage service serves static websites from.
pub const WEB_CONTAINER: &str = "$web";

pub const AZURE_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_LOCATION: &str = "AZURE_LOCATION";
pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
