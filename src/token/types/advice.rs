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
//
// SPDX-License-Identifier: Apache-2.0
//! Token advice.
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::token::error::TokenSpecError;

/// Advice attribute.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, Validate)]
pub struct AdviceAttribute {
    /// Attribute name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Optional friendly name.
    pub friendly_name: Option<String>,
    /// Attribute values.
    pub values: Vec<String>,
}

/// Information a relying party attached to the token request, or carried
/// over from a token used for delegation.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, Validate)]
pub struct Advice {
    #[validate(length(min = 1))]
    source: String,
    #[validate(length(min = 1), nested)]
    attributes: Vec<AdviceAttribute>,
}

impl Advice {
    /// Create advice from `source`. The attribute list must not be empty.
    pub fn new<S: Into<String>>(
        source: S,
        attributes: Vec<AdviceAttribute>,
    ) -> Result<Self, TokenSpecError> {
        let advice = Self {
            source: source.into(),
            attributes,
        };
        advice.validate()?;
        Ok(advice)
    }

    /// Source URI.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn attributes(&self) -> &[AdviceAttribute] {
        &self.attributes
    }
}
