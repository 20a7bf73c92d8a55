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

//! Converter for primitive numeric and boolean targets.

use std::any::TypeId;

use anyhow::Context as _;

use crate::context::InvocationContext;
use crate::target_type::TargetType;

use super::{ConversionResult, Converter, RootConverter};

/// Parses raw strings into integers, floats and booleans via `FromStr`.
pub struct PrimitiveConverter;

macro_rules! primitive_types {
    ($macro:ident) => {
        $macro!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize, isize, f32, f64, bool);
    };
}

macro_rules! is_supported {
    ($($t:ty),*) => {
        fn supported(id: TypeId) -> bool {
            [$(TypeId::of::<$t>()),*].contains(&id)
        }
    };
}

primitive_types!(is_supported);

impl Converter for PrimitiveConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        supported(target.id())
    }

    fn convert(
        &self,
        _ctx: &InvocationContext,
        value: &str,
        target: &TargetType,
        _root: &RootConverter,
    ) -> anyhow::Result<ConversionResult> {
        let trimmed = value.trim();
        macro_rules! parse_into {
            ($($t:ty),*) => {
                $(
                    if target.id() == TypeId::of::<$t>() {
                        let parsed = trimmed.parse::<$t>().with_context(|| {
                            format!(
                                "cannot parse '{trimmed}' as {}",
                                std::any::type_name::<$t>()
                            )
                        })?;
                        return Ok(ConversionResult::of(parsed));
                    }
                )*
            };
        }
        primitive_types!(parse_into);

        Ok(ConversionResult::Skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::MethodDescriptor;
    use std::sync::Arc;

    fn context() -> InvocationContext {
        InvocationContext::new(
            "Test",
            Arc::new(MethodDescriptor::builder("value").property("test.value").build()),
            Vec::new(),
        )
    }

    fn convert_to<T: std::any::Any + Send + Sync>(value: &str) -> anyhow::Result<T>
    where
        T: Clone,
    {
        let root = RootConverter::new(Vec::new());
        match PrimitiveConverter.convert(&context(), value, &TargetType::of::<T>(), &root)? {
            ConversionResult::Value(v) => {
                Ok((*v.downcast::<T>().expect("converter returned wrong type")).clone())
            }
            ConversionResult::Skip => anyhow::bail!("converter skipped"),
        }
    }

    #[test]
    fn test_parses_integers_and_floats() {
        assert_eq!(convert_to::<i32>("42").expect("i32"), 42);
        assert_eq!(convert_to::<i64>("-7").expect("i64"), -7);
        assert_eq!(convert_to::<u16>("65535").expect("u16"), 65535);
        assert!((convert_to::<f64>("2.5").expect("f64") - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parses_booleans() {
        assert!(convert_to::<bool>("true").expect("bool"));
        assert!(!convert_to::<bool>("false").expect("bool"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(convert_to::<i32>(" 42 ").expect("i32"), 42);
    }

    #[test]
    fn test_unparseable_value_is_an_error_not_a_skip() {
        assert!(convert_to::<i32>("not-a-number").is_err());
    }

    #[test]
    fn test_unsupported_target_skips() {
        let root = RootConverter::new(Vec::new());
        let result = PrimitiveConverter
            .convert(&context(), "raw", &TargetType::of::<Vec<String>>(), &root)
            .expect("convert");
        assert!(matches!(result, ConversionResult::Skip));
        assert!(!PrimitiveConverter.can_convert_to(&TargetType::of::<Vec<String>>()));
    }
}
