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

//! Declared resource registry.
//!
//! Execution ordering is carried by [`Output`](crate::Output) data flow; the
//! graph here is a declaration-time record of what was declared and which
//! attribute references connect the resources. It exists so a stack can be
//! inspected and compared structurally without applying anything.

use crate::{Error, Result};
use serde::Serialize;

/// A single declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNode {
    /// Logical name, unique within the stack.
    pub name: String,
    /// Provider type token, e.g. `azure:storage:StorageAccount`.
    pub type_token: String,
    /// Logical names of resources whose outputs this resource consumes.
    pub depends_on: Vec<String>,
}

/// The set of resources a stack declared, in declaration order.
///
/// Dependencies may only reference already-registered resources, so the
/// graph is acyclic by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
}

impl ResourceGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource with its dependencies.
    ///
    /// Fails if the logical name is already taken or a dependency has not
    /// been registered yet.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        type_token: impl Into<String>,
        depends_on: &[&str],
    ) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::config_invalid(format!(
                "duplicate logical resource name: {name}"
            )));
        }
        for dep in depends_on {
            if !self.contains(dep) {
                return Err(Error::config_invalid(format!(
                    "resource {name} depends on undeclared resource {dep}"
                )));
            }
        }

        self.nodes.push(ResourceNode {
            name,
            type_token: type_token.into(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }

    /// Whether a resource with the given logical name was declared.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// All declared resources in declaration order.
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// Number of declared resources.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no resources were declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct dependencies of the named resource.
    pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .map(|n| n.depends_on.as_slice())
    }
}
