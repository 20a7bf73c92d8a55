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

//! Variable expansion behavior, exercised through the root resolver.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use externalized_properties::{
    ExternalizedProperties, Interface, InvocationContext, MapResolver, MethodDescriptor,
    NoOpVariableExpander, ResolutionError, RootProcessor, RootResolver, SimpleVariableExpander,
    VariableExpander,
};

fn root_resolver<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> RootResolver
where
    K: Into<String>,
    V: Into<String>,
{
    RootResolver::new(
        vec![Arc::new(MapResolver::new(entries))],
        RootProcessor::new(Vec::new()),
        Arc::new(SimpleVariableExpander::new()),
    )
}

fn context() -> InvocationContext {
    InvocationContext::new(
        "Test",
        Arc::new(MethodDescriptor::builder("value").property("test.value").build()),
        Vec::new(),
    )
}

#[tokio::test]
async fn test_literal_without_tokens_is_unchanged() {
    let root = root_resolver::<&str, &str>([]);
    let expander = SimpleVariableExpander::new();

    let out = expander
        .expand(&root, &context(), "literal")
        .await
        .expect("expand");
    assert_eq!(out, "literal");
}

#[tokio::test]
async fn test_token_is_replaced_with_resolved_value() {
    let root = root_resolver([("custom.variable", "expanded")]);
    let expander = SimpleVariableExpander::new();

    let out = expander
        .expand(&root, &context(), "property-${custom.variable}")
        .await
        .expect("expand");
    assert_eq!(out, "property-expanded");
}

#[tokio::test]
async fn test_expansion_recurses_into_variable_values() {
    // The value of `outer` itself contains a token; the re-scan picks it up.
    let root = root_resolver([("outer", "${inner}-suffix"), ("inner", "deep")]);
    let expander = SimpleVariableExpander::new();

    let out = expander
        .expand(&root, &context(), "name-${outer}")
        .await
        .expect("expand");
    assert_eq!(out, "name-deep-suffix");
}

#[tokio::test]
async fn test_multiple_tokens_all_expand() {
    let root = root_resolver([("a", "1"), ("b", "2")]);
    let expander = SimpleVariableExpander::new();

    let out = expander
        .expand(&root, &context(), "${a}.${b}")
        .await
        .expect("expand");
    assert_eq!(out, "1.2");
}

#[tokio::test]
async fn test_malformed_tokens_are_left_verbatim() {
    let root = root_resolver([("x", "never-used")]);
    let expander = SimpleVariableExpander::new();

    for malformed in ["${}", "prefix-${x", "plain}"] {
        let out = expander
            .expand(&root, &context(), malformed)
            .await
            .expect("expand");
        assert_eq!(out, malformed);
    }
}

#[tokio::test]
async fn test_unresolvable_variable_is_an_error_not_a_literal() {
    let root = root_resolver::<&str, &str>([]);
    let expander = SimpleVariableExpander::new();

    let err = expander
        .expand(&root, &context(), "${nope}")
        .await
        .expect_err("must fail");
    assert!(matches!(
        err,
        ResolutionError::VariableExpansion { ref variable, .. } if variable == "nope"
    ));
}

#[tokio::test]
async fn test_custom_delimiters() {
    let root = root_resolver([("var", "value")]);
    let expander = SimpleVariableExpander::with_delimiters("#[", "]");

    let out = expander
        .expand(&root, &context(), "prefix-#[var]")
        .await
        .expect("expand");
    assert_eq!(out, "prefix-value");

    // The default delimiters no longer apply.
    let out = expander
        .expand(&root, &context(), "prefix-${var}")
        .await
        .expect("expand");
    assert_eq!(out, "prefix-${var}");
}

#[tokio::test]
async fn test_noop_expander_passes_tokens_through() {
    let properties = ExternalizedProperties::builder()
        .with_resolver(MapResolver::new([("${literal.name}", "kept")]))
        .with_variable_expander(NoOpVariableExpander)
        .build();

    let proxy = properties
        .initialize(
            Interface::builder("AppProperties")
                .method(
                    MethodDescriptor::builder("value")
                        .property("${literal.name}")
                        .build(),
                )
                .build(),
        )
        .await
        .expect("initialize");

    assert_eq!(proxy.get::<String>("value").await.expect("resolve"), "kept");
}
