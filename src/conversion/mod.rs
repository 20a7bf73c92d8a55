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

//! Ordered converter chain keyed by target type.

pub mod optional;
pub mod primitives;

pub use optional::OptionalConverter;
pub use primitives::PrimitiveConverter;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::trace;

use crate::context::InvocationContext;
use crate::error::ResolutionError;
use crate::target_type::{PropertyValue, TargetType};

/// Outcome of one converter attempt. `Skip` is an explicit variant, never an
/// identity-compared sentinel: it means "next converter, please", not "no
/// value".
pub enum ConversionResult {
    Value(PropertyValue),
    Skip,
}

impl ConversionResult {
    /// Wrap a typed value.
    pub fn of<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }
}

/// Maps a raw string to a typed value for specific target types.
///
/// `Skip` (never an error) is the answer for "not applicable".
pub trait Converter: Send + Sync {
    fn can_convert_to(&self, target: &TargetType) -> bool;

    /// Convert `value` to `target`. `root` allows converters for wrapper
    /// types to recurse into converting the inner type.
    fn convert(
        &self,
        ctx: &InvocationContext,
        value: &str,
        target: &TargetType,
        root: &RootConverter,
    ) -> anyhow::Result<ConversionResult>;
}

/// Ordered chain of converters with a memoized per-target candidate list.
///
/// The candidate list for a target type is computed once and reused, since
/// the set of requested types is effectively closed after construction.
pub struct RootConverter {
    converters: Vec<Arc<dyn Converter>>,
    by_target: RwLock<HashMap<TypeId, Arc<Vec<Arc<dyn Converter>>>>>,
}

impl RootConverter {
    pub fn new(converters: Vec<Arc<dyn Converter>>) -> Self {
        Self {
            converters,
            by_target: RwLock::new(HashMap::new()),
        }
    }

    pub fn can_convert_to(&self, target: &TargetType) -> bool {
        target.is_string() || !self.candidates_for(target).is_empty()
    }

    /// Convert `value` to the target type. String targets short-circuit with
    /// no conversion; otherwise candidates are tried in registration order,
    /// `Skip` falls through, and the first `Value` wins. An exhausted list
    /// or a failing converter raises a conversion error naming the type.
    pub fn convert(
        &self,
        ctx: &InvocationContext,
        property: &str,
        value: &str,
        target: &TargetType,
    ) -> Result<PropertyValue, ResolutionError> {
        if target.is_string() {
            return Ok(Arc::new(value.to_string()));
        }

        let candidates = self.candidates_for(target);
        trace!(
            "converting property '{property}' to '{}' via {} candidate(s)",
            target.name(),
            candidates.len()
        );
        for converter in candidates.iter() {
            match converter.convert(ctx, value, target, self) {
                Ok(ConversionResult::Value(converted)) => return Ok(converted),
                Ok(ConversionResult::Skip) => continue,
                Err(e) => {
                    return Err(ResolutionError::Conversion {
                        property: property.to_string(),
                        target_type: target.name().to_string(),
                        source: Some(e.into()),
                    })
                }
            }
        }

        Err(ResolutionError::Conversion {
            property: property.to_string(),
            target_type: target.name().to_string(),
            source: None,
        })
    }

    fn candidates_for(&self, target: &TargetType) -> Arc<Vec<Arc<dyn Converter>>> {
        {
            let memoized = match self.by_target.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(found) = memoized.get(&target.id()) {
                return found.clone();
            }
        }

        let computed: Arc<Vec<_>> = Arc::new(
            self.converters
                .iter()
                .filter(|c| c.can_convert_to(target))
                .cloned()
                .collect(),
        );
        let mut memoized = match self.by_target.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // First writer wins; duplicate computation under contention is fine.
        memoized.entry(target.id()).or_insert(computed).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::MethodDescriptor;

    struct SkippingConverter;

    impl Converter for SkippingConverter {
        fn can_convert_to(&self, target: &TargetType) -> bool {
            target.id() == TypeId::of::<i32>()
        }

        fn convert(
            &self,
            _ctx: &InvocationContext,
            _value: &str,
            _target: &TargetType,
            _root: &RootConverter,
        ) -> anyhow::Result<ConversionResult> {
            Ok(ConversionResult::Skip)
        }
    }

    struct FixedConverter(i32);

    impl Converter for FixedConverter {
        fn can_convert_to(&self, target: &TargetType) -> bool {
            target.id() == TypeId::of::<i32>()
        }

        fn convert(
            &self,
            _ctx: &InvocationContext,
            _value: &str,
            _target: &TargetType,
            _root: &RootConverter,
        ) -> anyhow::Result<ConversionResult> {
            Ok(ConversionResult::of(self.0))
        }
    }

    fn context() -> InvocationContext {
        InvocationContext::new(
            "Test",
            Arc::new(MethodDescriptor::builder("value").property("test.value").build()),
            Vec::new(),
        )
    }

    #[test]
    fn test_string_fast_path_needs_no_converters() {
        let root = RootConverter::new(Vec::new());
        let out = root
            .convert(&context(), "test.value", "raw", &TargetType::of::<String>())
            .expect("convert");
        assert_eq!(*out.downcast::<String>().expect("downcast"), "raw");
    }

    #[test]
    fn test_skip_falls_through_to_next_candidate() {
        let root = RootConverter::new(vec![
            Arc::new(SkippingConverter),
            Arc::new(FixedConverter(7)),
        ]);
        let out = root
            .convert(&context(), "test.value", "raw", &TargetType::of::<i32>())
            .expect("convert");
        assert_eq!(*out.downcast::<i32>().expect("downcast"), 7);
    }

    #[test]
    fn test_all_skips_raise_conversion_error() {
        let root = RootConverter::new(vec![
            Arc::new(SkippingConverter),
            Arc::new(SkippingConverter),
        ]);
        let err = root
            .convert(&context(), "test.value", "raw", &TargetType::of::<i32>())
            .expect_err("must fail");
        assert!(matches!(err, ResolutionError::Conversion { source: None, .. }));
    }

    #[test]
    fn test_no_applicable_converter_raises_conversion_error() {
        let root = RootConverter::new(vec![Arc::new(FixedConverter(7))]);
        let err = root
            .convert(&context(), "test.value", "raw", &TargetType::of::<u8>())
            .expect_err("must fail");
        assert!(matches!(err, ResolutionError::Conversion { .. }));
    }
}
