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

//! Process environment resolver.

use std::env;

use anyhow::bail;
use async_trait::async_trait;

use crate::context::InvocationContext;

use super::Resolver;

/// Resolves properties from process environment variables.
///
/// The property name is tried verbatim first, then in environment-variable
/// form: uppercased with `.` and `-` mapped to `_` (`java.home` ->
/// `JAVA_HOME`).
pub struct EnvResolver;

fn to_env_name(property_name: &str) -> String {
    property_name.to_uppercase().replace(['.', '-'], "_")
}

#[async_trait]
impl Resolver for EnvResolver {
    fn name(&self) -> &str {
        "environment"
    }

    async fn resolve(
        &self,
        _ctx: &InvocationContext,
        property_name: &str,
    ) -> anyhow::Result<Option<String>> {
        for candidate in [property_name.to_string(), to_env_name(property_name)] {
            match env::var(&candidate) {
                Ok(value) => return Ok(Some(value)),
                Err(env::VarError::NotPresent) => continue,
                Err(env::VarError::NotUnicode(_)) => {
                    bail!("environment variable '{candidate}' contains invalid unicode")
                }
            }
        }
        Ok(None)
    }
}
