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

//! Per-call invocation context and cache keys.

use std::sync::Arc;

use crate::interface::MethodDescriptor;
use crate::target_type::PropertyValue;

/// Identifies one proxied method call: the interface, the invoked method
/// descriptor, and the bound arguments. Immutable per call; passed through
/// the whole pipeline so collaborators can inspect annotations and the
/// declared target type.
#[derive(Clone)]
pub struct InvocationContext {
    interface: Arc<str>,
    method: Arc<MethodDescriptor>,
    args: Vec<PropertyValue>,
}

impl InvocationContext {
    pub fn new(
        interface: impl Into<Arc<str>>,
        method: Arc<MethodDescriptor>,
        args: Vec<PropertyValue>,
    ) -> Self {
        Self {
            interface: interface.into(),
            method,
            args,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    pub fn args(&self) -> &[PropertyValue] {
        &self.args
    }

    /// Downcast the argument at `index` to a string, if present.
    pub fn string_arg(&self, index: usize) -> Option<&String> {
        self.args.get(index).and_then(|a| a.downcast_ref::<String>())
    }
}

/// Cache key derived from method identity only. Call arguments are
/// deliberately not part of the key; methods whose property name derives
/// from an argument bypass the cache instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    interface: String,
    method: String,
}

impl CacheKey {
    pub fn new(interface: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            method: method.into(),
        }
    }

    pub fn for_context(ctx: &InvocationContext) -> Self {
        Self::new(ctx.interface(), ctx.method().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::MethodDescriptor;

    #[test]
    fn test_cache_key_ignores_arguments() {
        let method = Arc::new(MethodDescriptor::builder("value").property("app.value").build());
        let without_args = InvocationContext::new("App", method.clone(), Vec::new());
        let with_args =
            InvocationContext::new("App", method, vec![Arc::new("arg".to_string()) as _]);

        assert_eq!(
            CacheKey::for_context(&without_args),
            CacheKey::for_context(&with_args)
        );
    }

    #[test]
    fn test_string_arg_downcast() {
        let method = Arc::new(MethodDescriptor::builder("value").build());
        let ctx = InvocationContext::new(
            "App",
            method,
            vec![Arc::new("first".to_string()) as _, Arc::new(1_i32) as _],
        );

        assert_eq!(ctx.string_arg(0).map(String::as_str), Some("first"));
        assert!(ctx.string_arg(1).is_none());
        assert!(ctx.string_arg(2).is_none());
    }
}
