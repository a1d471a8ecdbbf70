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

//! Promise-like values for declared resources.
//!
//! A resource declaration returns handles whose concrete values are only
//! known after the provider round-trip completes. [`Output`] models such a
//! value: it is declared synchronously, resolves asynchronously, and can be
//! composed into further outputs with [`Output::map`] and
//! [`Output::and_then`]. A resource that consumes another resource's output
//! as input is thereby scheduled strictly after that output resolves.
//!
//! Resolution is memoized. Every clone of an `Output` observes the result of
//! a single underlying computation, so independent downstream chains share
//! upstream work but resolve (and fail) independently.

use crate::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::try_join;
use std::fmt::Debug;
use std::future::Future;

/// A value that becomes available once its resource resolves.
///
/// Outputs carry a secret tag. The tag is metadata, not a distinct type:
/// deriving from a secret output yields a secret output, and exports must
/// surface the tag so consumers store and display the value redacted.
pub struct Output<T: Clone> {
    inner: Shared<BoxFuture<'static, Result<T>>>,
    secret: bool,
}

impl<T: Clone> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            secret: self.secret,
        }
    }
}

impl<T: Clone> Debug for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

impl<T> Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an output from an asynchronous computation.
    ///
    /// The computation runs at most once, when the output (or any value
    /// derived from it) is first awaited.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            inner: fut.boxed().shared(),
            secret: false,
        }
    }

    /// Create an already-resolved output.
    pub fn from_value(value: T) -> Self {
        Self::new(async move { Ok(value) })
    }

    /// Derive a new output by applying a pure projection to the resolved
    /// value.
    pub fn map<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let inner = self.inner.clone();
        let mut out = Output::new(async move { Ok(f(inner.await?)) });
        out.secret = self.secret;
        out
    }

    /// Derive a new output by chaining an asynchronous continuation, such as
    /// a provider round-trip that consumes the resolved value.
    pub fn and_then<U, F, Fut>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U>> + Send,
    {
        let inner = self.inner.clone();
        let mut out = Output::new(async move { f(inner.await?).await });
        out.secret = self.secret;
        out
    }

    /// Mark this output as secret.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Whether this output carries the secret tag.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// Await the resolved value.
    pub async fn get(&self) -> Result<T> {
        self.inner.clone().await
    }
}

/// Combine two outputs into one that resolves once both have resolved.
///
/// The result is secret if either input is.
pub fn join<A, B>(a: &Output<A>, b: &Output<B>) -> Output<(A, B)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    let (fa, fb) = (a.inner.clone(), b.inner.clone());
    let mut out = Output::new(async move { try_join!(fa, fb) });
    out.secret = a.secret || b.secret;
    out
}

/// Combine three outputs into one that resolves once all have resolved.
pub fn join3<A, B, C>(a: &Output<A>, b: &Output<B>, c: &Output<C>) -> Output<(A, B, C)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    let (fa, fb, fc) = (a.inner.clone(), b.inner.clone(), c.inner.clone());
    let mut out = Output::new(async move { try_join!(fa, fb, fc) });
    out.secret = a.secret || b.secret || c.secret;
    out
}
