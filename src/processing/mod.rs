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

//! Annotation-driven post-processing of resolved values.

pub mod base64_decode;

pub use base64_decode::Base64DecodeProcessor;

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;

use crate::context::InvocationContext;
use crate::error::ResolutionError;
use crate::interface::Annotation;

/// Transforms an already-resolved string value (decode, decrypt, ...).
/// Invoked only for annotations that name this processor's id.
pub trait Processor: Send + Sync {
    /// Registration id matched against [`Annotation::processor`].
    fn name(&self) -> &str;

    /// Transform `value`. The triggering annotation carries the attributes
    /// (charset, algorithm, ...) the processor may need.
    fn process(
        &self,
        ctx: &InvocationContext,
        annotation: &Annotation,
        value: String,
    ) -> anyhow::Result<String>;
}

/// Applies registered processors to a resolved value, driven by the invoked
/// method's annotations in declaration order.
pub struct RootProcessor {
    by_id: HashMap<String, Arc<dyn Processor>>,
}

impl RootProcessor {
    /// Build the processor table. Instances are looked up by id at call
    /// time; the table never mutates after construction.
    pub fn new(processors: Vec<Arc<dyn Processor>>) -> Self {
        let mut by_id = HashMap::with_capacity(processors.len());
        for processor in processors {
            by_id.insert(processor.name().to_string(), processor);
        }
        Self { by_id }
    }

    /// Run `value` through every processor named by the method's
    /// annotations. An annotation naming an unregistered processor fails
    /// fast; annotations naming no processor are ignored.
    pub fn process(
        &self,
        ctx: &InvocationContext,
        property: &str,
        value: String,
    ) -> Result<String, ResolutionError> {
        let mut current = value;
        for annotation in ctx.method().annotations() {
            let Some(id) = annotation.processor() else {
                continue;
            };
            let processor =
                self.by_id
                    .get(id)
                    .ok_or_else(|| ResolutionError::ProcessorNotRegistered {
                        processor: id.to_string(),
                    })?;
            trace!("applying processor '{id}' to property '{property}'");
            current = processor.process(ctx, annotation, current).map_err(|e| {
                ResolutionError::Processing {
                    processor: id.to_string(),
                    property: property.to_string(),
                    source: e.into(),
                }
            })?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::MethodDescriptor;

    struct SuffixProcessor {
        id: &'static str,
        suffix: &'static str,
    }

    impl Processor for SuffixProcessor {
        fn name(&self) -> &str {
            self.id
        }

        fn process(
            &self,
            _ctx: &InvocationContext,
            _annotation: &Annotation,
            value: String,
        ) -> anyhow::Result<String> {
            Ok(format!("{value}{}", self.suffix))
        }
    }

    fn context(annotations: Vec<Annotation>) -> InvocationContext {
        let mut builder = MethodDescriptor::builder("value").property("test.value");
        for annotation in annotations {
            builder = builder.annotation(annotation);
        }
        InvocationContext::new("Test", Arc::new(builder.build()), Vec::new())
    }

    #[test]
    fn test_processors_apply_in_annotation_order() {
        let root = RootProcessor::new(vec![
            Arc::new(SuffixProcessor { id: "a", suffix: "-a" }),
            Arc::new(SuffixProcessor { id: "b", suffix: "-b" }),
        ]);
        let ctx = context(vec![
            Annotation::new("B").with_processor("b"),
            Annotation::new("A").with_processor("a"),
        ]);

        let out = root.process(&ctx, "test.value", "v".to_string()).expect("process");
        assert_eq!(out, "v-b-a");
    }

    #[test]
    fn test_annotations_without_processor_are_ignored() {
        let root = RootProcessor::new(Vec::new());
        let ctx = context(vec![Annotation::new("Delimiter").with_attribute("value", ",")]);

        let out = root.process(&ctx, "test.value", "v".to_string()).expect("process");
        assert_eq!(out, "v");
    }

    #[test]
    fn test_missing_processor_fails_fast() {
        let root = RootProcessor::new(Vec::new());
        let ctx = context(vec![Annotation::new("Decode").with_processor("base64-decode")]);

        let err = root
            .process(&ctx, "test.value", "v".to_string())
            .expect_err("must fail");
        assert!(matches!(
            err,
            ResolutionError::ProcessorNotRegistered { processor } if processor == "base64-decode"
        ));
    }
}
