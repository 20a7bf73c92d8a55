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

//! JSON file resolver.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;
use serde_json::Value;

use crate::context::InvocationContext;

use super::Resolver;

/// Resolves properties from a JSON object file loaded once at construction.
///
/// Nested objects are flattened into dot-separated keys and array elements
/// into indexed keys, so `{"app": {"hosts": ["a", "b"]}}` yields
/// `app.hosts[0]` and `app.hosts[1]`. Null values are skipped.
pub struct JsonFileResolver {
    entries: HashMap<String, String>,
}

impl JsonFileResolver {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read properties file '{}'", path.display()))?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let root: Value =
            serde_json::from_str(content).context("properties file is not valid JSON")?;
        if !root.is_object() {
            anyhow::bail!("properties file must contain a top-level JSON object");
        }

        let mut entries = HashMap::new();
        flatten("", &root, &mut entries);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(members) => {
            for (key, member) in members {
                let child = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&child, member, out);
            }
        }
        Value::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                flatten(&format!("{prefix}[{index}]"), element, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Null => {}
    }
}

#[async_trait]
impl Resolver for JsonFileResolver {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn resolve(
        &self,
        _ctx: &InvocationContext,
        property_name: &str,
    ) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(property_name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_nested_objects_and_arrays() {
        let resolver = JsonFileResolver::from_str(
            r#"{
                "app": {
                    "timeout": 30,
                    "debug": false,
                    "hosts": ["a.example.com", "b.example.com"],
                    "unset": null
                },
                "name": "service"
            }"#,
        )
        .expect("parse");

        assert_eq!(resolver.entries.get("app.timeout").map(String::as_str), Some("30"));
        assert_eq!(resolver.entries.get("app.debug").map(String::as_str), Some("false"));
        assert_eq!(
            resolver.entries.get("app.hosts[1]").map(String::as_str),
            Some("b.example.com")
        );
        assert_eq!(resolver.entries.get("name").map(String::as_str), Some("service"));
        assert!(!resolver.entries.contains_key("app.unset"));
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(JsonFileResolver::from_str("[1, 2]").is_err());
        assert!(JsonFileResolver::from_str("not json").is_err());
    }
}
