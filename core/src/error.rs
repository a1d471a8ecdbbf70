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

use std::fmt;
use thiserror::Error as ThisError;

/// The error type for sitestack operations.
#[derive(ThisError, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing fields, invalid values).
    ConfigInvalid,

    /// Credentials are missing, malformed or expired.
    CredentialInvalid,

    /// The cloud provider rejected a resource operation. The provider's
    /// response is carried unmodified in the message.
    ProviderRejected,

    /// An asynchronous value failed to resolve during output derivation.
    ResolutionFailed,

    /// A local asset could not be read.
    AssetInvalid,

    /// Unexpected errors (network, I/O, encoding, etc.).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a credential invalid error.
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a provider rejected error.
    pub fn provider_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderRejected, message)
    }

    /// Create a resolution failed error.
    pub fn resolution_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResolutionFailed, message)
    }

    /// Create an asset invalid error.
    pub fn asset_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AssetInvalid, message)
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl Clone for Error {
    // Resolved output values fan out to every consumer of the same
    // dependency subgraph, so errors must be clonable. Sources are not;
    // a clone keeps the kind and message only.
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::ProviderRejected => write!(f, "provider rejected the operation"),
            ErrorKind::ResolutionFailed => write!(f, "output resolution failed"),
            ErrorKind::AssetInvalid => write!(f, "invalid asset"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::provider_rejected("naming conflict: storage account exists");
        assert_eq!(
            err.to_string(),
            "naming conflict: storage account exists"
        );
        assert_eq!(err.kind(), ErrorKind::ProviderRejected);
    }

    #[test]
    fn test_error_clone_keeps_kind_and_message() {
        let err = Error::resolution_failed("key listing failed")
            .with_source(anyhow::anyhow!("status 503"));
        let cloned = err.clone();
        assert_eq!(cloned.kind(), ErrorKind::ResolutionFailed);
        assert_eq!(cloned.to_string(), "key listing failed");
    }
}
