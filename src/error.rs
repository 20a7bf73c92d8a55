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

//! Error taxonomy for the resolution pipeline.
//!
//! Collaborator failures (`anyhow::Error`) are wrapped at the pipeline
//! boundary with the offending property name or target type and re-thrown
//! synchronously to the caller. A single failure aborts the whole lookup;
//! there is no retry and no partial result.

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the invocation resolution pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// No resolver produced a value and the method declares no fallback.
    #[error("no value resolved for property '{property}'")]
    UnresolvedProperty { property: String },

    /// A resolver failed while looking up a property. Aborts the whole chain.
    #[error("resolver failed while resolving property '{property}'")]
    ResolverFailed {
        property: String,
        #[source]
        source: BoxedSource,
    },

    /// No applicable converter produced a value, or a converter failed.
    #[error("cannot convert property '{property}' to target type '{target_type}'")]
    Conversion {
        property: String,
        target_type: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// An annotation names a processor with no registered instance. This is
    /// a misconfiguration and fails fast rather than soft-skipping.
    #[error("no processor registered under id '{processor}'")]
    ProcessorNotRegistered { processor: String },

    /// A registered processor failed while transforming a resolved value.
    #[error("processing with '{processor}' failed for property '{property}'")]
    Processing {
        processor: String,
        property: String,
        #[source]
        source: BoxedSource,
    },

    /// A `${variable}` token could not be expanded.
    #[error("cannot expand variable '{variable}' in '{value}'")]
    VariableExpansion {
        variable: String,
        value: String,
        #[source]
        source: Option<Box<ResolutionError>>,
    },

    /// Caller precondition violation, distinct from the domain errors above.
    #[error("invalid invocation: {reason}")]
    InvalidInvocation { reason: String },
}

impl ResolutionError {
    pub fn invalid_invocation(reason: impl Into<String>) -> Self {
        Self::InvalidInvocation {
            reason: reason.into(),
        }
    }
}
