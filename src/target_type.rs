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

//! Stable type identifiers for conversion targets.
//!
//! Converters are selected by the declared return type of the invoked method.
//! A [`TargetType`] pairs a `TypeId` with the type name for diagnostics, and
//! optionally carries optional-wrapper metadata so `Option<T>` values can be
//! built behind the type-erased [`PropertyValue`] API.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Dynamically typed result of a conversion. Cheap to clone and cache.
pub type PropertyValue = Arc<dyn Any + Send + Sync>;

/// Identifies the declared return type of a proxied method.
#[derive(Clone)]
pub struct TargetType {
    type_id: TypeId,
    type_name: &'static str,
    optional: Option<Arc<OptionalTarget>>,
}

/// Metadata for `Option<T>` targets: the inner type plus monomorphized
/// constructors for wrapping a converted inner value and for the empty case.
pub struct OptionalTarget {
    inner: TargetType,
    wrap: fn(PropertyValue) -> Option<PropertyValue>,
    empty: fn() -> PropertyValue,
}

impl TargetType {
    /// Target type for a plain (non-optional) `T`.
    pub fn of<T: Any + Send + Sync>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            optional: None,
        }
    }

    /// Target type for `Option<T>`. Conversion recurses into the inner `T`
    /// and wraps the result; an absent raw value yields `None::<T>`.
    pub fn optional_of<T: Any + Send + Sync + Clone>() -> Self {
        Self {
            type_id: TypeId::of::<Option<T>>(),
            type_name: std::any::type_name::<Option<T>>(),
            optional: Some(Arc::new(OptionalTarget {
                inner: Self::of::<T>(),
                wrap: wrap_optional::<T>,
                empty: empty_optional::<T>,
            })),
        }
    }

    pub fn id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.type_name
    }

    /// Fast-path check: string targets need no conversion at all.
    pub fn is_string(&self) -> bool {
        self.type_id == TypeId::of::<String>()
    }

    pub fn optional(&self) -> Option<&OptionalTarget> {
        self.optional.as_deref()
    }
}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetType")
            .field("name", &self.type_name)
            .field("optional", &self.optional.is_some())
            .finish()
    }
}

impl OptionalTarget {
    pub fn inner(&self) -> &TargetType {
        &self.inner
    }

    /// Wrap a converted inner value into `Some(T)`. Returns `None` if the
    /// value is not actually of the inner type.
    pub fn wrap(&self, value: PropertyValue) -> Option<PropertyValue> {
        (self.wrap)(value)
    }

    /// Build the empty `None::<T>` value.
    pub fn empty(&self) -> PropertyValue {
        (self.empty)()
    }
}

fn wrap_optional<T: Any + Send + Sync + Clone>(value: PropertyValue) -> Option<PropertyValue> {
    value
        .downcast::<T>()
        .ok()
        .map(|inner| Arc::new(Some((*inner).clone())) as PropertyValue)
}

fn empty_optional<T: Any + Send + Sync>() -> PropertyValue {
    Arc::new(None::<T>)
}
