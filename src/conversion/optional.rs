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

//! Built-in converter for optional-wrapper targets.

use anyhow::Context as _;

use crate::context::InvocationContext;
use crate::target_type::TargetType;

use super::{ConversionResult, Converter, RootConverter};

/// Converts `Option<T>` targets by recursing into the root converter for the
/// inner `T` and wrapping the result. Auto-registered at the end of the
/// chain, so a caller-supplied converter for optional targets wins by order.
pub struct OptionalConverter;

impl Converter for OptionalConverter {
    fn can_convert_to(&self, target: &TargetType) -> bool {
        target.optional().is_some()
    }

    fn convert(
        &self,
        ctx: &InvocationContext,
        value: &str,
        target: &TargetType,
        root: &RootConverter,
    ) -> anyhow::Result<ConversionResult> {
        let Some(optional) = target.optional() else {
            return Ok(ConversionResult::Skip);
        };

        let property = match ctx.method().property() {
            crate::interface::PropertySource::Named(name) => name.as_str(),
            _ => ctx.method().name(),
        };
        let inner = root.convert(ctx, property, value, optional.inner())?;
        let wrapped = optional
            .wrap(inner)
            .context("inner conversion produced a value of the wrong type")?;
        Ok(ConversionResult::Value(wrapped))
    }
}
