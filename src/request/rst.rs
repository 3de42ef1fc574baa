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
//! `wst:RequestSecurityToken` body.
use std::str::FromStr;

use derive_builder::Builder;

use crate::authority::ValidatableToken;
use crate::common::{PrincipalId, TimePeriod};
use crate::error::BuilderError;
use crate::token::{Advice, ConfirmationType, SignatureAlgorithm, TokenSpecError};

/// Requested key type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyType {
    Bearer,
    PublicKey,
}

impl KeyType {
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Bearer => ConfirmationType::BEARER_URI,
            Self::PublicKey => ConfirmationType::HOLDER_OF_KEY_URI,
        }
    }
}

impl FromStr for KeyType {
    type Err = TokenSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match ConfirmationType::from_str(s)? {
            ConfirmationType::Bearer => Self::Bearer,
            ConfirmationType::HolderOfKey => Self::PublicKey,
        })
    }
}

/// `wst:Renewing`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Renewing {
    /// The issued token may be renewed.
    pub allow: bool,
    /// The issued token may be renewed after it expired.
    pub ok: bool,
}

impl Default for Renewing {
    fn default() -> Self {
        Self {
            allow: true,
            ok: false,
        }
    }
}

/// Token request.
#[derive(Builder, Clone, Debug, Default, PartialEq)]
#[builder(build_fn(error = "BuilderError"))]
#[builder(setter(strip_option, into))]
pub struct RequestSecurityToken {
    /// Correlation context, echoed in the response.
    #[builder(default)]
    pub context: Option<String>,

    /// Requested token lifetime.
    #[builder(default)]
    pub lifetime: Option<TimePeriod>,

    #[builder(default)]
    pub key_type: Option<KeyType>,

    /// Id of the request signature whose key the token is to be bound to.
    #[builder(default)]
    pub use_key: Option<String>,

    #[builder(default)]
    pub signature_algorithm: Option<SignatureAlgorithm>,

    /// Token the requester wants to act as (already parsed).
    #[builder(default)]
    pub act_as: Option<ValidatableToken>,

    /// Principal the issued token is delegated to.
    #[builder(default)]
    pub delegate_to: Option<PrincipalId>,

    /// Whether the issued token may be delegated further.
    #[builder(default)]
    pub delegatable: bool,

    #[builder(default)]
    pub renewing: Option<Renewing>,

    /// Relying party the token is requested for.
    #[builder(default)]
    pub applies_to: Option<String>,

    /// Advice requested for the token.
    #[builder(default)]
    pub advice: Vec<Advice>,

    /// Base64 negotiation blob.
    #[builder(default)]
    pub binary_exchange: Option<String>,
}
