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

//! Base64 decoding processor.

use anyhow::Context as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;

use crate::context::InvocationContext;
use crate::interface::Annotation;

use super::Processor;

/// Decodes a Base64-encoded resolved value into a UTF-8 string.
///
/// The triggering annotation may carry an `alphabet` attribute: `standard`
/// (the default) or `url`.
pub struct Base64DecodeProcessor;

/// Processor id referenced by decode annotations.
pub const BASE64_DECODE: &str = "base64-decode";

impl Processor for Base64DecodeProcessor {
    fn name(&self) -> &str {
        BASE64_DECODE
    }

    fn process(
        &self,
        _ctx: &InvocationContext,
        annotation: &Annotation,
        value: String,
    ) -> anyhow::Result<String> {
        let decoded = match annotation.attribute("alphabet") {
            Some("url") => URL_SAFE.decode(value.as_bytes()),
            Some(other) if other != "standard" => {
                anyhow::bail!("unsupported base64 alphabet '{other}'")
            }
            _ => STANDARD.decode(value.as_bytes()),
        }
        .context("value is not valid base64")?;

        String::from_utf8(decoded).context("decoded value is not valid UTF-8")
    }
}
