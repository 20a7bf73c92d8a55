// Copyright 2025 The Externalized Properties Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Variable expansion in property names.
//!
//! `${name}` tokens are resolved back through the same [`RootResolver`] the
//! outer lookup came in on, substituted, and the value re-scanned from the
//! start until no tokens remain. Expansion is recursive: a variable's value
//! may itself contain tokens. There is no cycle detection; a cyclic
//! definition recurses until the stack gives out.

use std::sync::Arc;

use async_trait::async_trait;
use log::trace;
use regex::Regex;

use crate::context::InvocationContext;
use crate::error::ResolutionError;
use crate::interface::MethodDescriptor;
use crate::resolvers::RootResolver;

/// Expands variable tokens in a property name before chain iteration.
#[async_trait]
pub trait VariableExpander: Send + Sync {
    /// Expand all tokens in `value`. The result must contain no resolvable
    /// tokens; an unresolvable variable is an error, never a literal
    /// passthrough.
    async fn expand(
        &self,
        root: &RootResolver,
        ctx: &InvocationContext,
        value: &str,
    ) -> Result<String, ResolutionError>;
}

/// Expander with configurable token delimiters, `${` / `}` by default.
///
/// Empty (`${}`) and unterminated (`${x`) tokens stop the scan and are left
/// verbatim. Inner names are resolved through an annotation-free,
/// string-typed lookup descriptor so no processors or conversions apply to
/// variable values.
pub struct SimpleVariableExpander {
    pattern: Regex,
    lookup: Arc<MethodDescriptor>,
}

const LOOKUP_INTERFACE: &str = "VariableLookup";

impl SimpleVariableExpander {
    pub fn new() -> Self {
        Self::with_delimiters("${", "}")
    }

    pub fn with_delimiters(prefix: &str, suffix: &str) -> Self {
        let pattern = format!("{}(.*?){}", regex::escape(prefix), regex::escape(suffix));
        Self {
            // Built from escaped literals, always a valid pattern.
            pattern: Regex::new(&pattern).expect("delimiters form an invalid pattern"),
            lookup: Arc::new(
                MethodDescriptor::builder("resolve")
                    .property_from_argument()
                    .build(),
            ),
        }
    }

    fn lookup_context(&self) -> InvocationContext {
        InvocationContext::new(LOOKUP_INTERFACE, self.lookup.clone(), Vec::new())
    }
}

impl Default for SimpleVariableExpander {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VariableExpander for SimpleVariableExpander {
    async fn expand(
        &self,
        root: &RootResolver,
        _ctx: &InvocationContext,
        value: &str,
    ) -> Result<String, ResolutionError> {
        let mut current = value.to_string();

        loop {
            let found = self.pattern.captures(&current).map(|captures| {
                let token = captures.get(0).map(|m| m.range()).unwrap_or_default();
                (token, captures[1].to_string())
            });
            let Some((range, variable)) = found else {
                return Ok(current);
            };
            if variable.is_empty() {
                // Malformed token such as "${}"; leave it as-is.
                return Ok(current);
            }

            trace!("expanding variable '{variable}' in '{value}'");
            let resolved = root
                .resolve(&self.lookup_context(), &variable)
                .await
                .map_err(|e| ResolutionError::VariableExpansion {
                    variable: variable.clone(),
                    value: value.to_string(),
                    source: Some(Box::new(e)),
                })?;

            let Some(replacement) = resolved else {
                return Err(ResolutionError::VariableExpansion {
                    variable,
                    value: value.to_string(),
                    source: None,
                });
            };

            current.replace_range(range, &replacement);
            // Re-scan from the start: the substituted value may itself
            // contain tokens.
        }
    }
}

/// Expander that performs no expansion at all; tokens pass through verbatim.
pub struct NoOpVariableExpander;

#[async_trait]
impl VariableExpander for NoOpVariableExpander {
    async fn expand(
        &self,
        _root: &RootResolver,
        _ctx: &InvocationContext,
        value: &str,
    ) -> Result<String, ResolutionError> {
        Ok(value.to_string())
    }
}
